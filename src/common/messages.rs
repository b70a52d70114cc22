//! Platform-neutral message types.
//!
//! The Discord layer converts serenity events into these types so the
//! forwarding handlers and commands can run without a gateway connection.

/// A guild message received from Discord.
#[derive(Debug, Clone, Default)]
pub struct IncomingMessage {
    pub message_id: u64,
    pub guild_id: u64,
    pub channel_id: u64,
    /// Channel name as shown in Discord (e.g. `mc-gear-check`).
    pub channel_name: String,
    pub author_id: u64,
    /// Server nickname, falling back to the global display name.
    pub author_display_name: String,
    pub content: String,
    /// Link that jumps to the original message.
    pub jump_url: String,
    /// Whether the message used `@everyone` or `@here`.
    pub mentions_everyone: bool,
    /// Whether the author holds the Mention Everyone permission.
    pub author_can_mention_everyone: bool,
    /// Whether the author holds Administrator or Manage Server.
    pub author_is_admin: bool,
}

impl IncomingMessage {
    /// Mention string for the author.
    pub fn author_mention(&self) -> String {
        format!("<@{}>", self.author_id)
    }
}

/// An embed-style notification sent to a destination channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Embed field name.
    pub title: String,
    /// Embed field value (markdown).
    pub body: String,
    /// Plain text sent after the embed so that it actually pings.
    pub mention: Option<String>,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            mention: None,
        }
    }

    pub fn with_mention(mut self, mention: impl Into<String>) -> Self {
        self.mention = Some(mention.into());
        self
    }
}
