//! Get-or-create access to guild configurations.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::common::error::{ModelError, StoreResult};
use crate::model::GuildConfiguration;
use crate::store::ConfigStore;

/// Loads and saves [`GuildConfiguration`] records by guild id.
#[derive(Clone)]
pub struct ConfigRepository {
    store: Arc<dyn ConfigStore>,
    key_prefix: String,
}

impl ConfigRepository {
    /// Records are stored under the bare guild id when `key_prefix` is empty,
    /// otherwise under `<prefix>:<guild id>`.
    pub fn new(store: Arc<dyn ConfigStore>, key_prefix: impl Into<String>) -> Self {
        Self {
            store,
            key_prefix: key_prefix.into(),
        }
    }

    pub fn key(&self, guild_id: u64) -> String {
        if self.key_prefix.is_empty() {
            guild_id.to_string()
        } else {
            format!("{}:{}", self.key_prefix, guild_id)
        }
    }

    /// Load the configuration for `guild_id`.
    ///
    /// A missing record yields an empty configuration that is not written
    /// back. A record that fails to decode is logged and also treated as
    /// empty; only store I/O errors are returned.
    pub async fn get_or_create_config(&self, guild_id: u64) -> StoreResult<GuildConfiguration> {
        let key = self.key(guild_id);
        let Some(bytes) = self.store.get(&key).await? else {
            debug!("No configuration stored for guild {}", guild_id);
            return Ok(GuildConfiguration::empty(guild_id));
        };

        match decode_for(&bytes, guild_id) {
            Ok(config) => Ok(config),
            Err(e) => {
                warn!("Ignoring stored configuration for guild {}: {}", guild_id, e);
                Ok(GuildConfiguration::empty(guild_id))
            }
        }
    }

    /// Replace the stored record of one guild.
    pub async fn persist(&self, config: &GuildConfiguration) -> StoreResult<()> {
        self.store.set(&self.key(config.guild_id), config.encode()).await
    }

    /// Replace the stored records of several guilds in one atomic write.
    ///
    /// Used for destination/source pairs so a binding is never stored on one
    /// side only.
    pub async fn persist_all(&self, configs: &[&GuildConfiguration]) -> StoreResult<()> {
        let entries = configs
            .iter()
            .map(|config| (self.key(config.guild_id), config.encode()))
            .collect();
        self.store.set_all(entries).await
    }
}

fn decode_for(bytes: &[u8], guild_id: u64) -> Result<GuildConfiguration, ModelError> {
    let config = GuildConfiguration::decode(bytes)?;
    if config.guild_id != guild_id {
        return Err(ModelError::GuildMismatch {
            stored: config.guild_id,
            requested: guild_id,
        });
    }
    Ok(config)
}
