//! [`ChatPlatform`] backed by serenity's HTTP client and gateway cache.

use std::sync::Arc;

use serenity::all::{ChannelId, GuildId, MessageId, RoleId, UserId};
use serenity::async_trait;
use serenity::builder::{CreateEmbed, CreateMessage};
use serenity::cache::Cache;
use serenity::http::Http;
use serenity::prelude::Context;

use crate::bridge::ChatPlatform;
use crate::common::error::{DiscordError, DiscordResult};
use crate::common::Notification;

#[derive(Clone)]
pub struct SerenityPlatform {
    http: Arc<Http>,
    cache: Arc<Cache>,
}

impl SerenityPlatform {
    pub fn new(http: Arc<Http>, cache: Arc<Cache>) -> Self {
        Self { http, cache }
    }

    pub fn from_context(context: &Context) -> Self {
        Self::new(context.http.clone(), context.cache.clone())
    }
}

// Serenity ids panic on zero.
fn channel_id(id: u64) -> DiscordResult<ChannelId> {
    if id == 0 {
        return Err(DiscordError::InvalidId(id));
    }
    Ok(ChannelId::new(id))
}

fn guild_id(id: u64) -> DiscordResult<GuildId> {
    if id == 0 {
        return Err(DiscordError::InvalidId(id));
    }
    Ok(GuildId::new(id))
}

fn role_and_user(role_id: u64, user_id: u64) -> DiscordResult<(RoleId, UserId)> {
    if role_id == 0 || user_id == 0 {
        return Err(DiscordError::InvalidId(if role_id == 0 { role_id } else { user_id }));
    }
    Ok((RoleId::new(role_id), UserId::new(user_id)))
}

#[async_trait]
impl ChatPlatform for SerenityPlatform {
    async fn send_notification(&self, channel: u64, notification: &Notification) -> DiscordResult<()> {
        let channel = channel_id(channel)?;
        let embed = CreateEmbed::new().field(&notification.title, &notification.body, false);
        channel
            .send_message(&self.http, CreateMessage::new().embed(embed))
            .await?;

        if let Some(mention) = &notification.mention {
            channel.say(&self.http, mention).await?;
        }
        Ok(())
    }

    async fn send_text(&self, channel: u64, text: &str) -> DiscordResult<()> {
        channel_id(channel)?.say(&self.http, text).await?;
        Ok(())
    }

    async fn reply(&self, channel: u64, message_id: u64, text: &str) -> DiscordResult<()> {
        let channel = channel_id(channel)?;
        if message_id == 0 {
            return Err(DiscordError::InvalidId(message_id));
        }
        let builder = CreateMessage::new()
            .content(text)
            .reference_message((channel, MessageId::new(message_id)));
        channel.send_message(&self.http, builder).await?;
        Ok(())
    }

    fn guild_accessible(&self, guild: u64) -> bool {
        guild_id(guild)
            .map(|guild| self.cache.guild(guild).is_some())
            .unwrap_or(false)
    }

    fn channel_guild(&self, channel: u64) -> Option<u64> {
        let channel = channel_id(channel).ok()?;
        self.cache.guilds().into_iter().find_map(|guild| {
            let cached = self.cache.guild(guild)?;
            cached.channels.contains_key(&channel).then(|| guild.get())
        })
    }

    fn role_exists(&self, guild: u64, role: u64) -> bool {
        let (Ok(guild), false) = (guild_id(guild), role == 0) else {
            return false;
        };
        self.cache
            .guild(guild)
            .map(|cached| cached.roles.contains_key(&RoleId::new(role)))
            .unwrap_or(false)
    }

    async fn add_role(&self, guild: u64, user: u64, role: u64) -> DiscordResult<()> {
        let guild = guild_id(guild)?;
        let (role, user) = role_and_user(role, user)?;
        self.http
            .add_member_role(guild, user, role, Some("Buff alert opt-in"))
            .await?;
        Ok(())
    }

    async fn remove_role(&self, guild: u64, user: u64, role: u64) -> DiscordResult<()> {
        let guild = guild_id(guild)?;
        let (role, user) = role_and_user(role, user)?;
        self.http
            .remove_member_role(guild, user, role, Some("Buff alert opt-out"))
            .await?;
        Ok(())
    }
}
