//! The persisted per-guild configuration record.

use serde::{Deserialize, Serialize};

use crate::common::error::ModelError;
use crate::model::bindings::DirectionalConfig;

/// Current layout version written by [`GuildConfiguration::encode`].
pub const SCHEMA_VERSION: u32 = 1;

/// Records written before versioning carried no `version` field.
fn legacy_version() -> u32 {
    1
}

/// Everything the bot stores about one guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuildConfiguration {
    #[serde(default = "legacy_version")]
    pub version: u32,
    pub guild_id: u64,
    /// Bindings where this guild receives forwarded messages.
    pub destination_config: DirectionalConfig,
    /// Bindings where this guild's messages are forwarded elsewhere.
    pub source_config: DirectionalConfig,
    /// Role pinged for buff alerts; `None` pings `@here`.
    pub buff_alert_role_id: Option<u64>,
}

impl GuildConfiguration {
    pub fn empty(guild_id: u64) -> Self {
        Self {
            version: SCHEMA_VERSION,
            guild_id,
            destination_config: DirectionalConfig::new(guild_id),
            source_config: DirectionalConfig::new(guild_id),
            buff_alert_role_id: None,
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.destination_config.is_empty()
            && self.source_config.is_empty()
            && self.buff_alert_role_id.is_none()
    }

    /// Mention used when alerting this guild about a buff.
    ///
    /// Falls back to `@here` when no role is configured or `role_exists`
    /// says the role is gone.
    pub fn buff_alert_mention(&self, role_exists: impl FnOnce(u64) -> bool) -> String {
        match self.buff_alert_role_id {
            Some(role_id) if role_exists(role_id) => format!("<@&{}>", role_id),
            _ => "@here".to_string(),
        }
    }

    /// Serialize the full record for storage.
    pub fn encode(&self) -> Vec<u8> {
        // Plain structs of integers, strings and vectors always serialize.
        serde_json::to_vec(self).unwrap_or_default()
    }

    /// Decode a stored record, rejecting unknown fields and versions.
    pub fn decode(bytes: &[u8]) -> Result<Self, ModelError> {
        let config: Self = serde_json::from_slice(bytes)?;
        if config.version != SCHEMA_VERSION {
            return Err(ModelError::UnsupportedVersion {
                found: config.version,
                expected: SCHEMA_VERSION,
            });
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated(guild_id: u64, n: u64) -> GuildConfiguration {
        let mut config = GuildConfiguration::empty(guild_id);
        for i in 0..n {
            config
                .destination_config
                .add_gear_check_source(100 + i, 42, format!("Realm{}", i));
            config.destination_config.add_buff_alert_source(700 + i, 43);
            config
                .source_config
                .add_gear_check_destination(200 + i, 50 + i, "Faerlina");
            config.source_config.add_buff_alert_destination(800 + i, 300 + i, 60 + i);
        }
        config.buff_alert_role_id = Some(555);
        config
    }

    #[test]
    fn test_round_trip_preserves_bindings() {
        let config = populated(1, 3);
        let decoded = GuildConfiguration::decode(&config.encode()).unwrap();
        assert_eq!(decoded, config);
        assert_eq!(decoded.destination_config.gear_check_infos.len(), 3);
        assert_eq!(decoded.source_config.buff_alert_infos.len(), 3);
    }

    #[test]
    fn test_wire_layout() {
        let config = populated(1, 1);
        let value: serde_json::Value = serde_json::from_slice(&config.encode()).unwrap();

        assert_eq!(value["buff_alert_role_id"], 555);
        assert_eq!(value["guild_id"], 1);
        let gear = &value["destination_config"]["gear_check_infos"][0];
        assert_eq!(gear["source_guild_id"], 100);
        assert_eq!(gear["destination_guild_id"], 1);
        assert_eq!(gear["destination_channel_id"], 42);
        assert_eq!(gear["realm"], "Realm0");
        let buff = &value["source_config"]["buff_alert_infos"][0];
        assert_eq!(buff["source_channel_id"], 800);
        assert_eq!(buff["destination_guild_id"], 300);
    }

    #[test]
    fn test_decode_legacy_record_without_version() {
        let json = br#"{
            "guild_id": 9,
            "destination_config": {"guild_id": 9, "buff_alert_infos": [], "gear_check_infos": []},
            "source_config": {"guild_id": 9, "buff_alert_infos": [], "gear_check_infos": []},
            "buff_alert_role_id": null
        }"#;
        let config = GuildConfiguration::decode(json).unwrap();
        assert_eq!(config, GuildConfiguration::empty(9));
    }

    #[test]
    fn test_decode_rejects_unknown_fields() {
        let json = br#"{
            "guild_id": 9,
            "destination_config": {"guild_id": 9, "buff_alert_infos": [], "gear_check_infos": []},
            "source_config": {"guild_id": 9, "buff_alert_infos": [], "gear_check_infos": []},
            "buff_alert_role_id": null,
            "surprise": true
        }"#;
        assert!(matches!(
            GuildConfiguration::decode(json),
            Err(ModelError::Malformed(_))
        ));
    }

    #[test]
    fn test_decode_rejects_missing_fields() {
        let json = br#"{"guild_id": 9, "buff_alert_role_id": null}"#;
        assert!(GuildConfiguration::decode(json).is_err());

        let json = br#"{
            "guild_id": 9,
            "destination_config": {"guild_id": 9, "buff_alert_infos": [],
                "gear_check_infos": [{"source_guild_id": 1, "destination_guild_id": 9}]},
            "source_config": {"guild_id": 9, "buff_alert_infos": [], "gear_check_infos": []}
        }"#;
        assert!(GuildConfiguration::decode(json).is_err());
    }

    #[test]
    fn test_decode_rejects_future_version() {
        let mut config = GuildConfiguration::empty(3);
        config.version = 2;
        let bytes = serde_json::to_vec(&config).unwrap();
        assert!(matches!(
            GuildConfiguration::decode(&bytes),
            Err(ModelError::UnsupportedVersion { found: 2, expected: 1 })
        ));
    }

    #[test]
    fn test_buff_alert_mention() {
        let mut config = GuildConfiguration::empty(1);
        assert_eq!(config.buff_alert_mention(|_| true), "@here");
        config.buff_alert_role_id = Some(77);
        assert_eq!(config.buff_alert_mention(|role_id| role_id == 77), "<@&77>");
        // Deleted role
        assert_eq!(config.buff_alert_mention(|_| false), "@here");
    }
}
