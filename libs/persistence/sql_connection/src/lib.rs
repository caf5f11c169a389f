pub use config::{DbConnectConfig, DbOptionsConfig, PostgresDbConfig};
pub use connection::{SqlConnect, connect_postgres_db};
pub use deadpool_postgres::PoolError;
pub use tokio_postgres::Error as PgError;

pub mod config;
mod connection;
