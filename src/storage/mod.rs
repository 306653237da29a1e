pub mod memory;
pub mod redis;

use std::time::Duration;

use deadpool_redis::{Config as RedisConfig, Pool as RedisPool, PoolConfig, Runtime};

use crate::{blink::Blink, error::BlinksError};

#[trait_variant::make(Send)]
pub trait BlinkStore {
    /// Liveness check against the backing store
    async fn ping(&self) -> Result<(), BlinksError>;

    /// Store a new blink unless its key is taken; `false` means it already existed
    async fn insert_blink(&self, blink: &Blink) -> Result<bool, BlinksError>;

    /// Fetch a blink by its normalized id
    async fn get_blink(&self, blink_url: &str) -> Result<Option<Blink>, BlinksError>;

    /// Overwrite `redirect_url` of an existing blink, returning the updated record
    async fn update_redirect_url(
        &self,
        blink_url: &str,
        redirect_url: &str,
    ) -> Result<Option<Blink>, BlinksError>;

    /// Remove a blink; `false` when there was nothing to remove
    async fn delete_blink(&self, blink_url: &str) -> Result<bool, BlinksError>;

    /// Every stored blink, in store enumeration order
    async fn list_blinks(&self) -> Result<Vec<Blink>, BlinksError>;
}

/// Create a Redis connection pool from a URL string
pub fn create_redis_pool(
    redis_url: &str,
    max_size: usize,
    timeout: Duration,
) -> Result<RedisPool, BlinksError> {
    let mut pool_cfg = PoolConfig::new(max_size);
    pool_cfg.timeouts.wait = Some(timeout);
    pool_cfg.timeouts.create = Some(timeout);
    pool_cfg.timeouts.recycle = Some(timeout);

    let mut cfg = RedisConfig::from_url(redis_url);
    cfg.pool = Some(pool_cfg);

    cfg.create_pool(Some(Runtime::Tokio1))
        .map_err(|e| BlinksError::StoreUnavailable(format!("Failed to create Redis pool: {}", e)))
}
