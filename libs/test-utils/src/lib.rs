pub mod memory_store;
pub mod postgres;
pub mod redis;
pub mod test_helpers;

pub use memory_store::MemoryAccountStore;
pub use postgres::TestPostgresContainer;
pub use redis::TestRedisContainer;
pub use test_helpers::*;
