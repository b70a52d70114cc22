//! Message classification.
//!
//! Decides whether an incoming message is a gear check or a buff alert
//! before any configuration or network work happens.

use crate::common::{IncomingMessage, RaidZone};
use crate::model::DirectionalConfig;

/// Gear check channels are named `<zone prefix>-...gear-check`, e.g. `bwl-gear-check`.
pub const GEAR_CHECK_CHANNEL_SUFFIX: &str = "gear-check";

/// Raid zone of a gear check channel, or `None` if the channel isn't one.
pub fn gear_check_zone(channel_name: &str) -> Option<RaidZone> {
    let name = channel_name.to_lowercase();
    name.strip_suffix(GEAR_CHECK_CHANNEL_SUFFIX)?;
    let prefix = name.split('-').next()?;
    RaidZone::from_channel_prefix(prefix)
}

pub fn is_gear_check_channel(channel_name: &str) -> bool {
    gear_check_zone(channel_name).is_some()
}

/// Whether `message` should be fanned out as a buff alert.
///
/// The author must be allowed to mention everyone, the message must actually
/// do so, and the sending guild must forward buff alerts somewhere. Any
/// channel of that guild qualifies.
pub fn is_buff_alert_candidate(
    message: &IncomingMessage,
    author_can_mention_everyone: bool,
    source_config: &DirectionalConfig,
) -> bool {
    author_can_mention_everyone
        && message.mentions_everyone
        && !source_config.buff_alert_infos.is_empty()
}
