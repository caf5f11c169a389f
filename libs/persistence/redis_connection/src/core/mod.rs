pub mod key;
pub mod value;

pub use key::{CacheKey, CacheKeyArg1, CacheKeyAutoConstruct};
pub use value::{CacheValue, Json, ValueError};
