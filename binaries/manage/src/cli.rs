use clap::{Parser, Subcommand, ValueEnum};
use redis_connection::config::RedisDbConfig;

#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(name = "wger-manage")]
#[command(about = "Administrative commands for the workout manager")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        global = true,
        help = "Database URL (or use DATABASE_URL env var)"
    )]
    pub database_url: Option<String>,

    #[arg(long, global = true, default_value = "redis")]
    pub cache: CacheBackend,

    #[arg(long, global = true, help = "Redis host (or use REDIS_HOST env var)")]
    pub redis_host: Option<String>,

    #[arg(long, global = true, help = "Redis port (or use REDIS_PORT env var)")]
    pub redis_port: Option<u16>,

    #[arg(long, global = true, help = "Redis db (or use REDIS_DB env var)")]
    pub redis_db: Option<u8>,

    #[arg(
        long,
        global = true,
        help = "Prefix of secondary fragment entries (or use \
                CACHE_KEY_PREFIX env var)"
    )]
    pub cache_prefix: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheBackend {
    /// Shared Redis cache
    Redis,
    /// Process-local cache, only useful for dry runs
    Memory,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Create an API user on behalf of an existing account
    CreateApiUser {
        username: String,
        email: String,
        creator_username: String,
    },

    /// Print the cache key of a template fragment
    FragmentKey {
        fragment_name: String,
        args: Vec<String>,
    },

    #[command(flatten)]
    Cache(CacheCommand),
}

/// Commands that talk to the cache backend
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum CacheCommand {
    /// Drop the cached canonical representation of a workout
    ResetWorkout { workout_id: i64 },

    /// Drop the cached workout log lists of a user for a month or day
    ResetWorkoutLog {
        user_id: i64,
        year: i32,
        month: u32,

        #[arg(long)]
        day: Option<u32>,
    },

    /// Delete a cached template fragment
    DeleteFragment {
        fragment_name: String,
        args: Vec<String>,
    },
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|value| value.parse().ok())
}

impl Cli {
    pub fn get_database_url(&self) -> String {
        self.database_url.clone().unwrap_or_else(|| {
            std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| sql_connection::config::uri_default())
        })
    }

    pub fn redis_config(&self) -> RedisDbConfig {
        let defaults = RedisDbConfig::default();

        RedisDbConfig {
            host: self
                .redis_host
                .clone()
                .or_else(|| std::env::var("REDIS_HOST").ok())
                .unwrap_or(defaults.host),
            port: self
                .redis_port
                .or_else(|| env_parse("REDIS_PORT"))
                .unwrap_or(defaults.port),
            db: self
                .redis_db
                .or_else(|| env_parse("REDIS_DB"))
                .unwrap_or(defaults.db),
        }
    }

    pub fn cache_prefix(&self) -> Option<String> {
        self.cache_prefix
            .clone()
            .or_else(|| std::env::var("CACHE_KEY_PREFIX").ok())
    }
}
