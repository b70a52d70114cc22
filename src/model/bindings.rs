//! Forwarding bindings and the per-direction collections that hold them.

use serde::{Deserialize, Serialize};

/// A guild whose gear check posts are forwarded to a channel on another guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GearCheckBinding {
    pub source_guild_id: u64,
    pub destination_guild_id: u64,
    pub destination_channel_id: u64,
    /// Realm used for leaderboard lookups (e.g. "Faerlina").
    pub realm: String,
}

/// A channel whose buff broadcasts are forwarded to a channel on another guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuffAlertBinding {
    pub source_channel_id: u64,
    pub destination_guild_id: u64,
    pub destination_channel_id: u64,
}

/// Bindings of one guild seen from one direction.
///
/// As a destination config, `guild_id` is the destination of every binding and
/// entries are keyed by their source. As a source config, `guild_id` is the
/// source and entries are keyed by their destination guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectionalConfig {
    pub guild_id: u64,
    pub buff_alert_infos: Vec<BuffAlertBinding>,
    pub gear_check_infos: Vec<GearCheckBinding>,
}

impl DirectionalConfig {
    pub fn new(guild_id: u64) -> Self {
        Self {
            guild_id,
            buff_alert_infos: Vec::new(),
            gear_check_infos: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.buff_alert_infos.is_empty() && self.gear_check_infos.is_empty()
    }

    // ------------------------------------------------------------------
    // Destination side: keyed by source, rejects duplicates.
    // ------------------------------------------------------------------

    /// Start receiving gear checks from `source_guild_id`.
    ///
    /// Returns `false` without changing anything if that guild is already bound.
    pub fn add_gear_check_source(
        &mut self,
        source_guild_id: u64,
        destination_channel_id: u64,
        realm: impl Into<String>,
    ) -> bool {
        if self.gear_check_source(source_guild_id).is_some() {
            return false;
        }
        self.gear_check_infos.push(GearCheckBinding {
            source_guild_id,
            destination_guild_id: self.guild_id,
            destination_channel_id,
            realm: realm.into(),
        });
        true
    }

    /// Returns `true` iff a binding for `source_guild_id` was removed.
    pub fn remove_gear_check_source(&mut self, source_guild_id: u64) -> bool {
        let before = self.gear_check_infos.len();
        self.gear_check_infos
            .retain(|info| info.source_guild_id != source_guild_id);
        self.gear_check_infos.len() != before
    }

    pub fn gear_check_source(&self, source_guild_id: u64) -> Option<&GearCheckBinding> {
        self.gear_check_infos
            .iter()
            .find(|info| info.source_guild_id == source_guild_id)
    }

    /// Start receiving buff alerts posted in `source_channel_id`.
    ///
    /// Returns `false` without changing anything if that channel is already bound.
    pub fn add_buff_alert_source(
        &mut self,
        source_channel_id: u64,
        destination_channel_id: u64,
    ) -> bool {
        if self.buff_alert_source(source_channel_id).is_some() {
            return false;
        }
        self.buff_alert_infos.push(BuffAlertBinding {
            source_channel_id,
            destination_guild_id: self.guild_id,
            destination_channel_id,
        });
        true
    }

    /// Returns `true` iff a binding for `source_channel_id` was removed.
    pub fn remove_buff_alert_source(&mut self, source_channel_id: u64) -> bool {
        let before = self.buff_alert_infos.len();
        self.buff_alert_infos
            .retain(|info| info.source_channel_id != source_channel_id);
        self.buff_alert_infos.len() != before
    }

    pub fn buff_alert_source(&self, source_channel_id: u64) -> Option<&BuffAlertBinding> {
        self.buff_alert_infos
            .iter()
            .find(|info| info.source_channel_id == source_channel_id)
    }

    // ------------------------------------------------------------------
    // Source side: keyed by destination guild, mirror writes are upserts.
    // ------------------------------------------------------------------

    /// Mirror of [`add_gear_check_source`](Self::add_gear_check_source).
    ///
    /// Replaces an existing entry for the same destination guild in place.
    pub fn add_gear_check_destination(
        &mut self,
        destination_guild_id: u64,
        destination_channel_id: u64,
        realm: impl Into<String>,
    ) {
        let binding = GearCheckBinding {
            source_guild_id: self.guild_id,
            destination_guild_id,
            destination_channel_id,
            realm: realm.into(),
        };
        match self
            .gear_check_infos
            .iter_mut()
            .find(|info| info.destination_guild_id == destination_guild_id)
        {
            Some(existing) => *existing = binding,
            None => self.gear_check_infos.push(binding),
        }
    }

    pub fn remove_gear_check_destination(&mut self, destination_guild_id: u64) {
        self.gear_check_infos
            .retain(|info| info.destination_guild_id != destination_guild_id);
    }

    /// Mirror of [`add_buff_alert_source`](Self::add_buff_alert_source).
    ///
    /// Replaces an existing entry for the same destination guild in place.
    pub fn add_buff_alert_destination(
        &mut self,
        source_channel_id: u64,
        destination_guild_id: u64,
        destination_channel_id: u64,
    ) {
        let binding = BuffAlertBinding {
            source_channel_id,
            destination_guild_id,
            destination_channel_id,
        };
        match self
            .buff_alert_infos
            .iter_mut()
            .find(|info| info.destination_guild_id == destination_guild_id)
        {
            Some(existing) => *existing = binding,
            None => self.buff_alert_infos.push(binding),
        }
    }

    pub fn remove_buff_alert_destination(&mut self, destination_guild_id: u64) {
        self.buff_alert_infos
            .retain(|info| info.destination_guild_id != destination_guild_id);
    }

    #[cfg(test)]
    pub fn has_buff_alert_destination(&self, destination_guild_id: u64) -> bool {
        self.buff_alert_infos
            .iter()
            .any(|info| info.destination_guild_id == destination_guild_id)
    }
}
