//! Key-value persistence for guild configurations.
//!
//! The store only sees opaque byte blobs; encoding lives in [`crate::model`]
//! and the get-or-create policy lives in [`repository`].

pub mod memory;
pub mod redis_store;
pub mod repository;

use async_trait::async_trait;

use crate::common::error::StoreResult;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use repository::ConfigRepository;

/// Minimal key-value capability the bot needs.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    async fn set(&self, key: &str, value: Vec<u8>) -> StoreResult<()>;

    /// Write every entry or none of them.
    async fn set_all(&self, entries: Vec<(String, Vec<u8>)>) -> StoreResult<()>;
}
