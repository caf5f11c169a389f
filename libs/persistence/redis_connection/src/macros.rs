/// Declares a unit struct implementing
/// [`CacheKey`](crate::core::key::CacheKey) for a key template.
///
/// ```ignore
/// cache_key!(IngredientCacheKey => "ingredient-{}"[id: Identifier]);
/// cache_key!(LanguageListCacheKey => "language-list");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($name:ident => $format_key:literal[$($arg:ident:$ty:ident),*]) => {
        #[doc=concat!("Cache key binding\n ## Key \n", $format_key)]
        pub struct $name;

        impl $crate::core::key::CacheKey for $name {
            type Args<'r> = ($(&'r $ty,)*);

            fn get_key_with_args(&self, args: Self::Args<'_>) -> std::borrow::Cow<'static, str> {
                let ($($arg,)*) = args;

                (format!($format_key, $($arg),*)).into()
            }
        }
    };
    ($name:ident => $key:literal) => {
        #[doc=concat!("Cache key binding\n ## Key \n", $key)]
        pub struct $name;

        impl $crate::core::key::CacheKey for $name {
            type Args<'r> = ();

            fn get_key_with_args(&self, _: Self::Args<'_>) -> std::borrow::Cow<'static, str> {
                ($key).into()
            }
        }
    };
}
