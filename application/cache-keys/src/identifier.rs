use std::{borrow::Cow, fmt};

use user_models::User;

/// Anything stored with a numeric primary key
pub trait PrimaryKey {
    fn pk(&self) -> i64;
}

impl PrimaryKey for User {
    fn pk(&self) -> i64 { self.id }
}

/// A resource reference used inside cache keys: either an entity, which
/// contributes its primary key, or a raw value used verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    Raw(String),
    Entity(i64),
}

impl Identifier {
    pub fn resolve(&self) -> Cow<'_, str> {
        match self {
            Self::Raw(value) => Cow::Borrowed(value),
            Self::Entity(pk) => Cow::Owned(pk.to_string()),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(value) => f.write_str(value),
            Self::Entity(pk) => write!(f, "{pk}"),
        }
    }
}

impl<T: PrimaryKey> From<&T> for Identifier {
    fn from(entity: &T) -> Self { Self::Entity(entity.pk()) }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self { Self::Raw(value.to_string()) }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self { Self::Raw(value) }
}

macro_rules! raw_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Identifier {
                fn from(value: $ty) -> Self { Self::Raw(value.to_string()) }
            }
        )*
    };
}

raw_from_number!(i32, i64, u32, u64);

#[cfg(test)]
mod tests {
    use super::*;

    struct Workout {
        id: i64,
    }

    impl PrimaryKey for Workout {
        fn pk(&self) -> i64 { self.id }
    }

    #[test]
    fn test_entity_resolves_to_primary_key() {
        let workout = Workout { id: 42 };

        assert_eq!(Identifier::from(&workout).resolve(), "42");
    }

    #[test]
    fn test_raw_value_is_used_verbatim() {
        assert_eq!(Identifier::from("de").resolve(), "de");
        assert_eq!(Identifier::from(42_i64).resolve(), "42");
        assert_eq!(Identifier::from(String::from(" x ")).to_string(), " x ");
    }
}
