//! Redis-backed store.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::debug;

use crate::common::error::{StoreError, StoreResult};
use crate::store::ConfigStore;

/// A [`ConfigStore`] on top of a Redis server.
#[derive(Clone)]
pub struct RedisStore {
    client: redis::Client,
}

impl RedisStore {
    /// Parse the connection URL. No connection is made until first use.
    pub fn open(url: &str) -> StoreResult<Self> {
        let client = redis::Client::open(url)?;
        Ok(Self { client })
    }

    async fn connection(&self) -> StoreResult<MultiplexedConnection> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }

    /// Read a UTF-8 string value, used for secrets kept alongside the configs.
    pub async fn get_string(&self, key: &str) -> StoreResult<Option<String>> {
        match self.get(key).await? {
            Some(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|_| StoreError::InvalidUtf8 {
                    key: key.to_string(),
                }),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ConfigStore for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let mut conn = self.connection().await?;
        let value: Option<Vec<u8>> = conn.get(key).await?;
        debug!("redis GET {} -> {}", key, if value.is_some() { "hit" } else { "miss" });
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        let mut conn = self.connection().await?;
        let _: () = conn.set(key, value).await?;
        debug!("redis SET {}", key);
        Ok(())
    }

    async fn set_all(&self, entries: Vec<(String, Vec<u8>)>) -> StoreResult<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut conn = self.connection().await?;
        let mut pipe = redis::pipe();
        pipe.atomic();
        for (key, value) in &entries {
            pipe.set(key, value.as_slice()).ignore();
        }
        let _: () = pipe.query_async(&mut conn).await?;
        debug!("redis MULTI SET {} keys", entries.len());
        Ok(())
    }
}
