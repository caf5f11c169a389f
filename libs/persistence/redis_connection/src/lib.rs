use std::net::IpAddr;

use anyhow::anyhow;
use deadpool_redis::{Config, Pool, Runtime};
pub use deadpool_redis::{PoolError, redis::RedisError};
use tracing::{info, instrument};
use url::Url;

pub mod cache;
pub mod config;
pub mod core;
pub mod macros;

pub use crate::cache::{CacheError, CacheResult, CacheTrait, MemoryCache, RedisCache};
pub use crate::core::{key::CacheKey, value::Json};

/// Builds the `redis://host:port/db` url for a connection config. IP
/// literals, including bare IPv6 addresses, are accepted as hosts.
pub fn redis_url<C>(config: &C) -> anyhow::Result<Url>
where
    C: config::DbConnectConfig,
{
    let mut url = Url::parse("redis://")?;

    match config.host().parse::<IpAddr>() {
        Ok(ip) => url
            .set_ip_host(ip)
            .map_err(|()| anyhow!("invalid redis host {ip}"))?,
        Err(_) => url.set_host(Some(config.host()))?,
    }
    url.set_port(Some(config.port()))
        .map_err(|()| anyhow!("cannot set port on {url}"))?;
    let url_str = url.to_string();
    url.path_segments_mut()
        .map_err(|()| anyhow!("cannot set db on {url_str}"))?
        .push(&config.db().to_string());

    Ok(url)
}

#[instrument(skip_all, name = "connect-redis")]
pub async fn connect_redis_db<C>(config: &C) -> Result<Pool, anyhow::Error>
where
    C: config::DbConnectConfig,
{
    let url = redis_url(config)?;

    info!(redis.url = %url, redis.connect = true);

    let cfg = Config {
        url: Some(url.to_string()),
        pool: Some(deadpool_redis::PoolConfig::default()),
        connection: None,
    };

    let pool = cfg.create_pool(Some(Runtime::Tokio1))?;
    Ok(pool)
}
