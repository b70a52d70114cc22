//! Forwarding orchestrator.
//!
//! Takes one incoming guild message through classification, configuration
//! lookup, external lookups and delivery. Errors never escape
//! [`Bridge::handle_message`]; a failed message is logged and dropped.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use futures::future::join_all;
use tracing::{debug, error, info, warn};

use crate::bridge::classify::{gear_check_zone, is_buff_alert_candidate, is_gear_check_channel};
use crate::bridge::formatter;
use crate::bridge::platform::ChatPlatform;
use crate::common::IncomingMessage;
use crate::config::types::GearCheckConfig;
use crate::gear::{CharacterNameSource, GearLinkMatcher, GearSite, RaidLogSource};
use crate::model::{BuffAlertBinding, GuildConfiguration};
use crate::store::ConfigRepository;

/// Routes gear checks and buff alerts to their configured destinations.
pub struct Bridge {
    repository: ConfigRepository,
    matcher: GearLinkMatcher,
    names: Arc<dyn CharacterNameSource>,
    raid_logs: Arc<dyn RaidLogSource>,
    require_sixty_upgrades: bool,
}

impl Bridge {
    pub fn new(
        repository: ConfigRepository,
        names: Arc<dyn CharacterNameSource>,
        raid_logs: Arc<dyn RaidLogSource>,
        gear_check: &GearCheckConfig,
    ) -> Self {
        Self {
            repository,
            matcher: GearLinkMatcher::new(),
            names,
            raid_logs,
            require_sixty_upgrades: gear_check.require_sixty_upgrades,
        }
    }

    /// Process one message. Failures are logged, never returned.
    pub async fn handle_message(&self, platform: &dyn ChatPlatform, message: &IncomingMessage) {
        if let Err(e) = self.route_message(platform, message).await {
            error!(
                "Failed to process message {} in #{}: {:#}",
                message.message_id, message.channel_name, e
            );
        }
    }

    async fn route_message(&self, platform: &dyn ChatPlatform, message: &IncomingMessage) -> Result<()> {
        if is_gear_check_channel(&message.channel_name) {
            return self.handle_gear_check(platform, message).await;
        }

        // Cheap checks first so ordinary chatter never touches the store.
        if message.mentions_everyone && message.author_can_mention_everyone {
            let config = self.repository.get_or_create_config(message.guild_id).await?;
            if is_buff_alert_candidate(message, message.author_can_mention_everyone, &config.source_config) {
                return self.handle_buff_alert(platform, message, &config).await;
            }
        }

        Ok(())
    }

    async fn handle_gear_check(&self, platform: &dyn ChatPlatform, message: &IncomingMessage) -> Result<()> {
        let Some(zone) = gear_check_zone(&message.channel_name) else {
            return Ok(());
        };
        let Some(link) = self.matcher.find(&message.content) else {
            debug!("No gear link in #{} message {}", message.channel_name, message.message_id);
            return Ok(());
        };

        // Unconfigured guilds get no replies and no lookups.
        let config = self.repository.get_or_create_config(message.guild_id).await?;
        let destinations = &config.source_config.gear_check_infos;
        if destinations.is_empty() {
            debug!("Guild {} has no gear check destinations", message.guild_id);
            return Ok(());
        }

        info!(
            "Gear check from {} in #{} ({}): {}",
            message.author_display_name,
            message.channel_name,
            zone.name(),
            link.url
        );

        let scraped = self.names.fetch_character_name(&link).await;
        if scraped.is_none() && link.private {
            platform
                .reply(
                    message.channel_id,
                    message.message_id,
                    &formatter::private_link_reply(&message.author_mention()),
                )
                .await?;
            return Ok(());
        }
        let character_name = scraped.unwrap_or_else(|| message.author_display_name.clone());

        if self.require_sixty_upgrades && link.site != GearSite::SixtyUpgrades {
            if let Err(e) = platform
                .reply(
                    message.channel_id,
                    message.message_id,
                    &formatter::preferred_site_reply(&message.author_mention(), link.site),
                )
                .await
            {
                warn!("Failed to send gear site reminder: {}", e);
            }
        }

        let mut logs_by_realm: HashMap<&str, Option<String>> = HashMap::new();
        for binding in destinations {
            if !platform.guild_accessible(binding.destination_guild_id) {
                warn!(
                    "Skipping gear check destination guild {}: not accessible",
                    binding.destination_guild_id
                );
                continue;
            }

            let raid_logs_url = match logs_by_realm.get(binding.realm.as_str()) {
                Some(url) => url.clone(),
                None => {
                    let url = self
                        .raid_logs
                        .fetch_raid_log_url(zone.id(), &character_name, &binding.realm)
                        .await;
                    logs_by_realm.insert(binding.realm.as_str(), url.clone());
                    url
                }
            };

            let notification = formatter::gear_check_notification(
                &message.author_display_name,
                &message.channel_name,
                &message.jump_url,
                &character_name,
                raid_logs_url.as_deref(),
            );

            match platform
                .send_notification(binding.destination_channel_id, &notification)
                .await
            {
                Ok(()) => info!(
                    "Forwarded gear check for {} to guild {} channel {}",
                    character_name, binding.destination_guild_id, binding.destination_channel_id
                ),
                Err(e) => error!(
                    "Failed to forward gear check to channel {}: {}",
                    binding.destination_channel_id, e
                ),
            }
        }

        Ok(())
    }

    async fn handle_buff_alert(
        &self,
        platform: &dyn ChatPlatform,
        message: &IncomingMessage,
        config: &GuildConfiguration,
    ) -> Result<()> {
        info!(
            "Buff alert from {} in #{}: {}",
            message.author_display_name, message.channel_name, message.content
        );

        let deliveries = config
            .source_config
            .buff_alert_infos
            .iter()
            .map(|binding| async move {
                let result = self.deliver_buff_alert(platform, message, binding).await;
                (binding, result)
            });

        for (binding, result) in join_all(deliveries).await {
            if let Err(e) = result {
                error!(
                    "Failed to deliver buff alert to guild {} channel {}: {:#}",
                    binding.destination_guild_id, binding.destination_channel_id, e
                );
            }
        }

        Ok(())
    }

    async fn deliver_buff_alert(
        &self,
        platform: &dyn ChatPlatform,
        message: &IncomingMessage,
        binding: &BuffAlertBinding,
    ) -> Result<()> {
        if !platform.guild_accessible(binding.destination_guild_id) {
            warn!(
                "Skipping buff alert destination guild {}: not accessible",
                binding.destination_guild_id
            );
            return Ok(());
        }

        let destination = self
            .repository
            .get_or_create_config(binding.destination_guild_id)
            .await?;
        let mention = destination.buff_alert_mention(|role_id| {
            platform.role_exists(binding.destination_guild_id, role_id)
        });
        let notification =
            formatter::buff_alert_notification(&message.content, &message.jump_url, &mention);

        platform
            .send_notification(binding.destination_channel_id, &notification)
            .await?;
        debug!(
            "Buff alert delivered to guild {} channel {}",
            binding.destination_guild_id, binding.destination_channel_id
        );
        Ok(())
    }
}
