use std::borrow::Cow;

pub trait CacheKey {
    type Args<'r>;

    fn get_key_with_args(&self, args: Self::Args<'_>) -> Cow<'static, str>;

    fn get_key(&self) -> Cow<'static, str>
    where
        for<'r> Self::Args<'r>: CacheKeyAutoConstruct,
    {
        CacheKey::get_key_with_args(self, CacheKeyAutoConstruct::construct())
    }

    /// Key for single-argument templates
    fn get_key_with<'r>(
        &self, arg: <Self::Args<'r> as CacheKeyArg1>::Arg0,
    ) -> Cow<'static, str>
    where
        Self::Args<'r>: CacheKeyArg1,
    {
        CacheKey::get_key_with_args(self, CacheKeyArg1::construct(arg))
    }
}

pub trait CacheKeyArg1 {
    type Arg0;

    fn construct(arg0: Self::Arg0) -> Self;
}

impl<T> CacheKeyArg1 for (T,) {
    type Arg0 = T;

    fn construct(arg0: Self::Arg0) -> Self { (arg0,) }
}

pub trait CacheKeyAutoConstruct {
    fn construct() -> Self;
}

impl CacheKeyAutoConstruct for () {
    fn construct() -> Self {}
}
