use std::{
    collections::{HashMap, HashSet},
    sync::LazyLock,
    time::Duration,
};

use deadpool_redis::Pool as RedisPool;
use redis::{AsyncCommands, Script};

use crate::blink::{Blink, KEY_PREFIX, blink_url_from_key, store_key};
use crate::error::BlinksError;
use crate::storage::{BlinkStore, create_redis_pool};

/// Keys fetched per SCAN round trip
const SCAN_BATCH: usize = 100;

/// Existence check and write in one step, so two concurrent creates of the
/// same blink cannot both succeed.
static INSERT_IF_ABSENT: LazyLock<Script> = LazyLock::new(|| {
    Script::new(
        r"
        if redis.call('EXISTS', KEYS[1]) == 1 then
            return 0
        end
        redis.call('HSET', KEYS[1], 'redirect_url', ARGV[1], 'created_at', ARGV[2])
        return 1
        ",
    )
});

/// Touches `redirect_url` only, and only while the hash still exists.
/// Returns the full hash after the write, or an empty reply when absent.
static UPDATE_IF_PRESENT: LazyLock<Script> = LazyLock::new(|| {
    Script::new(
        r"
        if redis.call('EXISTS', KEYS[1]) == 0 then
            return {}
        end
        redis.call('HSET', KEYS[1], 'redirect_url', ARGV[1])
        return redis.call('HGETALL', KEYS[1])
        ",
    )
});

/// Blinks stored as one Redis hash per key under `blink:<id>`.
#[derive(Clone)]
pub struct RedisStorage {
    pool: RedisPool,
}

impl RedisStorage {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    pub fn try_from_redis_url(
        redis_url: &str,
        pool_size: usize,
        timeout: Duration,
    ) -> Result<Self, BlinksError> {
        let pool = create_redis_pool(redis_url, pool_size, timeout)?;
        Ok(Self::new(pool))
    }

    /// Close the pool; pending and future checkouts fail with `StoreUnavailable`.
    pub fn close(&self) {
        self.pool.close();
    }
}

/// Every key in the blink namespace, each listed once.
async fn scan_blink_keys(
    conn: &mut deadpool_redis::Connection,
) -> Result<Vec<String>, BlinksError> {
    let pattern = format!("{}*", KEY_PREFIX);
    let mut seen = HashSet::new();
    let mut keys = Vec::new();
    let mut cursor: u64 = 0;

    loop {
        let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(&pattern)
            .arg("COUNT")
            .arg(SCAN_BATCH)
            .query_async(&mut *conn)
            .await?;

        // SCAN may return a key more than once across iterations
        for key in batch {
            if seen.insert(key.clone()) {
                keys.push(key);
            }
        }

        if next == 0 {
            break;
        }
        cursor = next;
    }

    Ok(keys)
}

/// Build a blink from its hash fields; an empty hash means the key is absent.
fn blink_from_fields(
    key: &str,
    blink_url: &str,
    mut fields: HashMap<String, String>,
) -> Result<Option<Blink>, BlinksError> {
    if fields.is_empty() {
        return Ok(None);
    }

    let mut take = |field: &'static str| {
        fields.remove(field).ok_or_else(|| BlinksError::CorruptRecord {
            key: key.to_string(),
            field,
        })
    };

    Ok(Some(Blink {
        blink_url: blink_url.to_string(),
        redirect_url: take("redirect_url")?,
        created_at: take("created_at")?,
    }))
}

impl BlinkStore for RedisStorage {
    async fn ping(&self) -> Result<(), BlinksError> {
        let mut conn = self.pool.get().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn insert_blink(&self, blink: &Blink) -> Result<bool, BlinksError> {
        let mut conn = self.pool.get().await?;
        let inserted: i64 = INSERT_IF_ABSENT
            .key(blink.key())
            .arg(&blink.redirect_url)
            .arg(&blink.created_at)
            .invoke_async(&mut conn)
            .await?;

        Ok(inserted == 1)
    }

    async fn get_blink(&self, blink_url: &str) -> Result<Option<Blink>, BlinksError> {
        let key = store_key(blink_url);
        let mut conn = self.pool.get().await?;
        let fields: HashMap<String, String> = conn.hgetall(&key).await?;

        blink_from_fields(&key, blink_url, fields)
    }

    async fn update_redirect_url(
        &self,
        blink_url: &str,
        redirect_url: &str,
    ) -> Result<Option<Blink>, BlinksError> {
        let key = store_key(blink_url);
        let mut conn = self.pool.get().await?;
        let fields: HashMap<String, String> = UPDATE_IF_PRESENT
            .key(&key)
            .arg(redirect_url)
            .invoke_async(&mut conn)
            .await?;

        blink_from_fields(&key, blink_url, fields)
    }

    async fn delete_blink(&self, blink_url: &str) -> Result<bool, BlinksError> {
        let mut conn = self.pool.get().await?;
        let removed: usize = conn.del(store_key(blink_url)).await?;
        Ok(removed > 0)
    }

    async fn list_blinks(&self) -> Result<Vec<Blink>, BlinksError> {
        let mut conn = self.pool.get().await?;
        let keys = scan_blink_keys(&mut conn).await?;

        let mut blinks = Vec::with_capacity(keys.len());
        for key in keys {
            let Some(blink_url) = blink_url_from_key(&key) else {
                continue;
            };
            let fields: HashMap<String, String> = conn.hgetall(&key).await?;

            // Deleted between SCAN and HGETALL
            match blink_from_fields(&key, blink_url, fields)? {
                Some(blink) => blinks.push(blink),
                None => tracing::debug!(key = %key, "Blink vanished during listing"),
            }
        }

        Ok(blinks)
    }
}
