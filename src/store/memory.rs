//! In-process store used for development runs and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::common::error::StoreResult;
use crate::store::ConfigStore;

#[derive(Debug, Default)]
struct Inner {
    values: HashMap<String, Vec<u8>>,
    /// Number of write operations (`set` or `set_all`) performed.
    writes: usize,
}

/// A [`ConfigStore`] backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of write operations seen so far.
    #[cfg(test)]
    pub async fn write_count(&self) -> usize {
        self.inner.lock().await.writes
    }

    /// Raw value for `key`, bypassing the trait.
    #[cfg(test)]
    pub async fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.inner.lock().await.values.get(key).cloned()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.inner.lock().await.values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        inner.values.insert(key.to_string(), value);
        inner.writes += 1;
        Ok(())
    }

    async fn set_all(&self, entries: Vec<(String, Vec<u8>)>) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        inner.values.extend(entries);
        inner.writes += 1;
        Ok(())
    }
}
