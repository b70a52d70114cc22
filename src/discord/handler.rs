//! Discord message event handling.
//!
//! Turns serenity events into [`IncomingMessage`]s. Commands are answered
//! inline; everything else goes through the per-channel queues.

use std::sync::Arc;

use serenity::model::channel::Message;
use serenity::model::guild::Guild;
use serenity::prelude::*;
use tracing::{debug, info, warn};

use crate::bridge::{Bridge, ChannelQueues, ChatPlatform};
use crate::common::IncomingMessage;
use crate::discord::commands::CommandHandler;
use crate::discord::platform::SerenityPlatform;

/// Handles messages and guild joins coming off the event loop.
pub struct BotHandler {
    commands: CommandHandler,
    queues: ChannelQueues,
}

impl BotHandler {
    pub fn new(commands: CommandHandler, bridge: Arc<Bridge>) -> Self {
        Self {
            commands,
            queues: ChannelQueues::new(bridge),
        }
    }

    pub async fn handle_message(&mut self, context: &Context, message: &Message) {
        let Some(incoming) = incoming_message(context, message) else {
            return;
        };
        let platform: Arc<dyn ChatPlatform> = Arc::new(SerenityPlatform::from_context(context));

        // Commands run one at a time so configuration updates never interleave.
        if incoming.content.starts_with(self.commands.prefix()) {
            if let Some(reply) = self.commands.handle_command(platform.as_ref(), &incoming).await {
                if let Err(e) = platform.send_text(incoming.channel_id, &reply).await {
                    warn!("Failed to send command reply to channel {}: {}", incoming.channel_id, e);
                }
                return;
            }
        }

        self.queues.dispatch(platform, incoming);
    }

    pub async fn handle_guild_create(&self, context: &Context, guild: &Guild, is_new: bool) {
        if !is_new {
            debug!("Guild available: {} ({})", guild.name, guild.id);
            return;
        }

        info!("Joined guild {} ({})", guild.name, guild.id);
        let Some(system_channel) = guild.system_channel_id else {
            return;
        };

        let greeting = format!(
            "Thanks for adding me! Type `{}help` to see what I can do.",
            self.commands.prefix()
        );
        let platform = SerenityPlatform::from_context(context);
        if let Err(e) = platform.send_text(system_channel.get(), &greeting).await {
            warn!("Failed to greet guild {}: {}", guild.id, e);
        }
    }
}

/// Convert a gateway message, skipping our own, other bots and DMs.
fn incoming_message(context: &Context, message: &Message) -> Option<IncomingMessage> {
    if message.author.bot || message.author.id == context.cache.current_user().id {
        return None;
    }
    let guild_id = message.guild_id?;

    let content = message.content.trim();
    if content.is_empty() {
        return None;
    }

    let channel_name = context
        .cache
        .guild(guild_id)
        .and_then(|guild| guild.channels.get(&message.channel_id).map(|c| c.name.clone()))
        .unwrap_or_default();

    let permissions = message.author_permissions(&context.cache);
    let author_display_name = message
        .member
        .as_ref()
        .and_then(|m| m.nick.clone())
        .unwrap_or_else(|| message.author.display_name().to_string());

    Some(IncomingMessage {
        message_id: message.id.get(),
        guild_id: guild_id.get(),
        channel_id: message.channel_id.get(),
        channel_name,
        author_id: message.author.id.get(),
        author_display_name,
        content: content.to_string(),
        jump_url: message.link(),
        mentions_everyone: message.mention_everyone,
        author_can_mention_everyone: permissions.is_some_and(|p| p.mention_everyone()),
        author_is_admin: permissions.is_some_and(|p| p.administrator() || p.manage_guild()),
    })
}
