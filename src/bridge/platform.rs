//! Chat platform capabilities used by forwarding and commands.

use async_trait::async_trait;

use crate::common::error::DiscordResult;
use crate::common::Notification;

/// What the bot needs from the chat platform.
///
/// Lookups are answered from the gateway cache and never block; sends go over
/// HTTP.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    async fn send_notification(&self, channel_id: u64, notification: &Notification) -> DiscordResult<()>;

    async fn send_text(&self, channel_id: u64, text: &str) -> DiscordResult<()>;

    /// Reply to a specific message in its channel.
    async fn reply(&self, channel_id: u64, message_id: u64, text: &str) -> DiscordResult<()>;

    /// Whether the bot is a member of `guild_id`.
    fn guild_accessible(&self, guild_id: u64) -> bool;

    /// The guild a channel belongs to, if the bot can see it.
    fn channel_guild(&self, channel_id: u64) -> Option<u64>;

    fn role_exists(&self, guild_id: u64, role_id: u64) -> bool;

    async fn add_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> DiscordResult<()>;

    async fn remove_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> DiscordResult<()>;
}
