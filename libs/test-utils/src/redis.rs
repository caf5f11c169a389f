use std::time::Duration;

use anyhow::{Context, Result};
use deadpool_redis::{Config, Pool, PoolConfig, Runtime, redis};
use testcontainers_modules::{
    redis::{REDIS_PORT, Redis},
    testcontainers::{ContainerAsync, runners::AsyncRunner},
};
use tracing::debug;

/// Redis test container with a ready connection pool
pub struct TestRedisContainer {
    pub pool: Pool,
    pub connection_string: String,
    // Keep the container alive for the lifetime of this struct
    _container: ContainerAsync<Redis>,
}

impl TestRedisContainer {
    /// Starts a fresh Redis container on a random port and waits until it
    /// answers `PING`.
    pub async fn new() -> Result<Self> {
        let container = Redis::default()
            .start()
            .await
            .context("Failed to start Redis container")?;

        let host = container.get_host().await?;
        let port = container.get_host_port_ipv4(REDIS_PORT).await?;
        let connection_string = format!("redis://{host}:{port}/0");

        let mut cfg = Config::from_url(&connection_string);
        cfg.pool = Some(PoolConfig::new(10));
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .context("Failed to build Redis connection pool")?;

        let mut attempts = 0;
        loop {
            let ready = match pool.get().await {
                Ok(mut conn) => {
                    redis::cmd("PING")
                        .query_async::<()>(&mut conn)
                        .await
                        .is_ok()
                }
                Err(_) => false,
            };
            if ready {
                break;
            }
            if attempts >= 20 {
                anyhow::bail!("Redis not ready after {attempts} attempts");
            }
            attempts += 1;
            debug!(attempts, "Waiting for Redis");
            tokio::time::sleep(Duration::from_millis(250)).await;
        }

        Ok(Self {
            pool,
            connection_string,
            _container: container,
        })
    }

    pub async fn get_connection(&self) -> Result<deadpool_redis::Connection> {
        Ok(self.pool.get().await?)
    }

    /// Remaining time to live of `key` in seconds, `-1` without expiry and
    /// `-2` when the key is absent
    pub async fn ttl(&self, key: &str) -> Result<i64> {
        let mut conn = self.get_connection().await?;
        Ok(redis::cmd("TTL").arg(key).query_async(&mut conn).await?)
    }
}
