//! Discord bot commands (`tog.setup_gear_check`, `tog.buff_me`, etc).
//!
//! Handles command parsing and execution. Configuration commands update the
//! destination guild (the one the command is typed in) and the source guild
//! together.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::bridge::ChatPlatform;
use crate::common::error::{DiscordError, StoreError};
use crate::common::IncomingMessage;
use crate::model::GuildConfiguration;
use crate::store::ConfigRepository;

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// Forward gear checks from another server to this channel.
    SetupGearCheck { source_guild_id: u64, realm: String },
    RemoveGearCheck { source_guild_id: u64 },
    /// Forward buff alerts from a channel to this channel.
    SetupBuffAlerts { source_channel_id: u64, role_id: Option<u64> },
    RemoveBuffAlerts { source_channel_id: u64 },
    BuffMe,
    DebuffMe,
    Help,
}

/// Why a command was refused. Rendered straight into the reply.
#[derive(Debug, Error)]
pub enum CommandRejection {
    #[error("Usage: `{0}`")]
    Usage(String),

    #[error("Only server administrators can change the bot configuration.")]
    NotAdmin,

    #[error("{0} is already set up.")]
    AlreadyExists(String),

    #[error("{0} is not set up.")]
    NotFound(String),

    #[error("I can't access server {0}. Make sure I've been invited there first.")]
    GuildInaccessible(u64),

    #[error("I can't access channel {0}. Make sure I've been invited to its server and can see it.")]
    ChannelInaccessible(u64),

    #[error("Role {0} doesn't exist on this server.")]
    RoleInaccessible(u64),

    #[error("Buff alerts on this server already ping <@&{configured}>. Remove every buff alert forwarded here to use a different role.")]
    RoleConflict { configured: u64 },

    #[error("No buff alert role is set up on this server.")]
    NoBuffRole,

    #[error("Couldn't save the configuration, please try again later.")]
    Store(#[from] StoreError),

    #[error("Discord refused the request: {0}")]
    Discord(#[from] DiscordError),
}

type CommandResult = Result<String, CommandRejection>;

/// Parse `content` as a command.
///
/// Returns `None` for anything that isn't one of our commands.
pub fn parse_command(prefix: &str, content: &str) -> Option<Result<BotCommand, CommandRejection>> {
    let rest = content.trim().strip_prefix(prefix)?;
    let mut parts = rest.split_whitespace();
    let name = parts.next()?.to_lowercase();
    let args: Vec<&str> = parts.collect();

    let usage = |syntax: &str| CommandRejection::Usage(format!("{}{}", prefix, syntax));

    let command = match name.as_str() {
        "setup_gear_check" => {
            const SYNTAX: &str = "setup_gear_check <source_server_id> <realm>";
            match args.as_slice() {
                [guild, realm @ ..] if !realm.is_empty() => parse_id(guild)
                    .map(|source_guild_id| BotCommand::SetupGearCheck {
                        source_guild_id,
                        realm: realm.join(" "),
                    })
                    .ok_or_else(|| usage(SYNTAX)),
                _ => Err(usage(SYNTAX)),
            }
        }
        "remove_gear_check" => {
            const SYNTAX: &str = "remove_gear_check <source_server_id>";
            match args.as_slice() {
                [guild] => parse_id(guild)
                    .map(|source_guild_id| BotCommand::RemoveGearCheck { source_guild_id })
                    .ok_or_else(|| usage(SYNTAX)),
                _ => Err(usage(SYNTAX)),
            }
        }
        "setup_buff_alerts" => {
            const SYNTAX: &str = "setup_buff_alerts <source_channel_id> [role_id]";
            match args.as_slice() {
                [channel] => parse_id(channel)
                    .map(|source_channel_id| BotCommand::SetupBuffAlerts {
                        source_channel_id,
                        role_id: None,
                    })
                    .ok_or_else(|| usage(SYNTAX)),
                [channel, role] => match (parse_id(channel), parse_id(role)) {
                    (Some(source_channel_id), Some(role_id)) => Ok(BotCommand::SetupBuffAlerts {
                        source_channel_id,
                        role_id: Some(role_id),
                    }),
                    _ => Err(usage(SYNTAX)),
                },
                _ => Err(usage(SYNTAX)),
            }
        }
        "remove_buff_alerts" => {
            const SYNTAX: &str = "remove_buff_alerts <source_channel_id>";
            match args.as_slice() {
                [channel] => parse_id(channel)
                    .map(|source_channel_id| BotCommand::RemoveBuffAlerts { source_channel_id })
                    .ok_or_else(|| usage(SYNTAX)),
                _ => Err(usage(SYNTAX)),
            }
        }
        "buff_me" => Ok(BotCommand::BuffMe),
        "debuff_me" => Ok(BotCommand::DebuffMe),
        "help" => Ok(BotCommand::Help),
        _ => return None,
    };

    Some(command)
}

/// Parse a Discord id, accepting raw ids and `<#id>` / `<@&id>` mentions.
fn parse_id(arg: &str) -> Option<u64> {
    let digits = arg
        .strip_prefix("<#")
        .or_else(|| arg.strip_prefix("<@&"))
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(arg);
    digits.parse::<u64>().ok().filter(|id| *id != 0)
}

/// Executes configuration commands against the repository.
#[derive(Clone)]
pub struct CommandHandler {
    repository: ConfigRepository,
    prefix: String,
}

impl CommandHandler {
    pub fn new(repository: ConfigRepository, prefix: impl Into<String>) -> Self {
        Self {
            repository,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Parse and execute a command from Discord.
    ///
    /// Returns the reply to post, or `None` if the message wasn't a command.
    pub async fn handle_command(
        &self,
        platform: &dyn ChatPlatform,
        message: &IncomingMessage,
    ) -> Option<String> {
        let command = parse_command(&self.prefix, &message.content)?;
        debug!("Processing command {:?} from {}", command, message.author_display_name);

        let result = match command {
            Ok(command) => self.execute(platform, message, command).await,
            Err(rejection) => Err(rejection),
        };

        Some(match result {
            Ok(reply) => reply,
            Err(rejection) => {
                match &rejection {
                    CommandRejection::Store(e) => warn!("Command failed on store error: {}", e),
                    CommandRejection::Discord(e) => warn!("Command failed on Discord error: {}", e),
                    other => info!(
                        "Rejected command from {} in guild {}: {}",
                        message.author_display_name, message.guild_id, other
                    ),
                }
                rejection.to_string()
            }
        })
    }

    pub async fn execute(
        &self,
        platform: &dyn ChatPlatform,
        message: &IncomingMessage,
        command: BotCommand,
    ) -> CommandResult {
        match command {
            BotCommand::SetupGearCheck { source_guild_id, realm } => {
                self.setup_gear_check(platform, message, source_guild_id, realm).await
            }
            BotCommand::RemoveGearCheck { source_guild_id } => {
                self.remove_gear_check(message, source_guild_id).await
            }
            BotCommand::SetupBuffAlerts { source_channel_id, role_id } => {
                self.setup_buff_alerts(platform, message, source_channel_id, role_id).await
            }
            BotCommand::RemoveBuffAlerts { source_channel_id } => {
                self.remove_buff_alerts(platform, message, source_channel_id).await
            }
            BotCommand::BuffMe => self.buff_me(platform, message, true).await,
            BotCommand::DebuffMe => self.buff_me(platform, message, false).await,
            BotCommand::Help => Ok(self.help_text()),
        }
    }

    async fn setup_gear_check(
        &self,
        platform: &dyn ChatPlatform,
        message: &IncomingMessage,
        source_guild_id: u64,
        realm: String,
    ) -> CommandResult {
        require_admin(message)?;
        if !platform.guild_accessible(source_guild_id) {
            return Err(CommandRejection::GuildInaccessible(source_guild_id));
        }

        let destination_guild_id = message.guild_id;
        let destination_channel_id = message.channel_id;
        self.update_pair(
            destination_guild_id,
            source_guild_id,
            |destination| {
                if destination.destination_config.add_gear_check_source(
                    source_guild_id,
                    destination_channel_id,
                    realm.as_str(),
                ) {
                    Ok(())
                } else {
                    Err(CommandRejection::AlreadyExists(format!(
                        "Gear check forwarding from server {}",
                        source_guild_id
                    )))
                }
            },
            |source| {
                source.source_config.add_gear_check_destination(
                    destination_guild_id,
                    destination_channel_id,
                    realm.as_str(),
                );
                Ok(())
            },
        )
        .await?;

        info!(
            "Gear checks from guild {} now forwarded to guild {} channel {} ({})",
            source_guild_id, destination_guild_id, destination_channel_id, realm
        );
        Ok(format!(
            "Gear checks posted in server {} will be forwarded to <#{}> with raid logs from {}.",
            source_guild_id, destination_channel_id, realm
        ))
    }

    async fn remove_gear_check(&self, message: &IncomingMessage, source_guild_id: u64) -> CommandResult {
        require_admin(message)?;

        let destination_guild_id = message.guild_id;
        self.update_pair(
            destination_guild_id,
            source_guild_id,
            |destination| {
                if destination.destination_config.remove_gear_check_source(source_guild_id) {
                    Ok(())
                } else {
                    Err(CommandRejection::NotFound(format!(
                        "Gear check forwarding from server {}",
                        source_guild_id
                    )))
                }
            },
            |source| {
                source
                    .source_config
                    .remove_gear_check_destination(destination_guild_id);
                Ok(())
            },
        )
        .await?;

        info!(
            "Gear checks from guild {} no longer forwarded to guild {}",
            source_guild_id, destination_guild_id
        );
        Ok(format!(
            "Gear checks from server {} will no longer be forwarded here.",
            source_guild_id
        ))
    }

    async fn setup_buff_alerts(
        &self,
        platform: &dyn ChatPlatform,
        message: &IncomingMessage,
        source_channel_id: u64,
        role_id: Option<u64>,
    ) -> CommandResult {
        require_admin(message)?;
        let source_guild_id = platform
            .channel_guild(source_channel_id)
            .ok_or(CommandRejection::ChannelInaccessible(source_channel_id))?;

        let destination_guild_id = message.guild_id;
        let destination_channel_id = message.channel_id;
        if let Some(role_id) = role_id {
            if !platform.role_exists(destination_guild_id, role_id) {
                return Err(CommandRejection::RoleInaccessible(role_id));
            }
        }

        self.update_pair(
            destination_guild_id,
            source_guild_id,
            |destination| {
                if let Some(role_id) = role_id {
                    match destination.buff_alert_role_id {
                        Some(configured) if configured != role_id => {
                            return Err(CommandRejection::RoleConflict { configured });
                        }
                        _ => destination.buff_alert_role_id = Some(role_id),
                    }
                }
                if destination
                    .destination_config
                    .add_buff_alert_source(source_channel_id, destination_channel_id)
                {
                    Ok(())
                } else {
                    Err(CommandRejection::AlreadyExists(format!(
                        "Buff alert forwarding from <#{}>",
                        source_channel_id
                    )))
                }
            },
            |source| {
                // One channel per source server and destination keeps removal unambiguous.
                if let Some(existing) = source
                    .source_config
                    .buff_alert_infos
                    .iter()
                    .find(|info| info.destination_guild_id == destination_guild_id)
                {
                    if existing.source_channel_id != source_channel_id {
                        return Err(CommandRejection::AlreadyExists(format!(
                            "Buff alert forwarding from that server (via <#{}>)",
                            existing.source_channel_id
                        )));
                    }
                }
                source.source_config.add_buff_alert_destination(
                    source_channel_id,
                    destination_guild_id,
                    destination_channel_id,
                );
                Ok(())
            },
        )
        .await?;

        info!(
            "Buff alerts from channel {} (guild {}) now forwarded to guild {} channel {}",
            source_channel_id, source_guild_id, destination_guild_id, destination_channel_id
        );
        let mention = match role_id {
            Some(role_id) => format!("<@&{}>", role_id),
            None => "@here".to_string(),
        };
        Ok(format!(
            "Buff alerts posted in <#{}> will be forwarded to <#{}> and ping {}.",
            source_channel_id, destination_channel_id, mention
        ))
    }

    async fn remove_buff_alerts(
        &self,
        platform: &dyn ChatPlatform,
        message: &IncomingMessage,
        source_channel_id: u64,
    ) -> CommandResult {
        require_admin(message)?;

        let destination_guild_id = message.guild_id;
        let remove_source = |destination: &mut GuildConfiguration| {
            if destination
                .destination_config
                .remove_buff_alert_source(source_channel_id)
            {
                // The role only means something while alerts arrive here.
                if destination.destination_config.buff_alert_infos.is_empty() {
                    destination.buff_alert_role_id = None;
                }
                Ok(())
            } else {
                Err(CommandRejection::NotFound(format!(
                    "Buff alert forwarding from <#{}>",
                    source_channel_id
                )))
            }
        };

        let Some(source_guild_id) = platform.channel_guild(source_channel_id) else {
            let mut destination = self
                .repository
                .get_or_create_config(destination_guild_id)
                .await?;
            remove_source(&mut destination)?;
            self.repository.persist(&destination).await?;
            warn!(
                "Removed buff alerts from channel {} for guild {} without cleaning up the source server",
                source_channel_id, destination_guild_id
            );
            return Ok(format!(
                "Buff alerts from <#{}> will no longer be forwarded here. \
                 I couldn't reach that channel's server, so its side of the setup was left as is.",
                source_channel_id
            ));
        };

        self.update_pair(destination_guild_id, source_guild_id, remove_source, |source| {
            source
                .source_config
                .remove_buff_alert_destination(destination_guild_id);
            Ok(())
        })
        .await?;

        info!(
            "Buff alerts from channel {} no longer forwarded to guild {}",
            source_channel_id, destination_guild_id
        );
        Ok(format!(
            "Buff alerts from <#{}> will no longer be forwarded here.",
            source_channel_id
        ))
    }

    async fn buff_me(&self, platform: &dyn ChatPlatform, message: &IncomingMessage, add: bool) -> CommandResult {
        let config = self.repository.get_or_create_config(message.guild_id).await?;
        let role_id = config.buff_alert_role_id.ok_or(CommandRejection::NoBuffRole)?;
        if !platform.role_exists(message.guild_id, role_id) {
            return Err(CommandRejection::RoleInaccessible(role_id));
        }

        if add {
            platform
                .add_role(message.guild_id, message.author_id, role_id)
                .await?;
            Ok(format!(
                "{} you will now be pinged for buff alerts.",
                message.author_mention()
            ))
        } else {
            platform
                .remove_role(message.guild_id, message.author_id, role_id)
                .await?;
            Ok(format!(
                "{} you will no longer be pinged for buff alerts.",
                message.author_mention()
            ))
        }
    }

    /// Load both sides, apply the changes, and write them in one go.
    ///
    /// When source and destination are the same guild both closures run on a
    /// single record.
    async fn update_pair<D, S>(
        &self,
        destination_guild_id: u64,
        source_guild_id: u64,
        on_destination: D,
        on_source: S,
    ) -> Result<(), CommandRejection>
    where
        D: FnOnce(&mut GuildConfiguration) -> Result<(), CommandRejection>,
        S: FnOnce(&mut GuildConfiguration) -> Result<(), CommandRejection>,
    {
        let mut destination = self
            .repository
            .get_or_create_config(destination_guild_id)
            .await?;
        on_destination(&mut destination)?;

        if source_guild_id == destination_guild_id {
            on_source(&mut destination)?;
            self.repository.persist(&destination).await?;
        } else {
            let mut source = self.repository.get_or_create_config(source_guild_id).await?;
            on_source(&mut source)?;
            self.repository.persist_all(&[&destination, &source]).await?;
        }
        Ok(())
    }

    pub fn help_text(&self) -> String {
        let p = &self.prefix;
        format!(
            r#"**Available Commands:**
• `{p}setup_gear_check <source_server_id> <realm>` - Forward gear checks from another server to this channel
• `{p}remove_gear_check <source_server_id>` - Stop forwarding gear checks from a server
• `{p}setup_buff_alerts <source_channel_id> [role_id]` - Forward buff alerts from a channel to this channel
• `{p}remove_buff_alerts <source_channel_id>` - Stop forwarding buff alerts from a channel
• `{p}buff_me` - Get pinged for buff alerts
• `{p}debuff_me` - Stop getting pinged for buff alerts
• `{p}help` - Show this help message

Gear checks are picked up in channels named like `mc-gear-check`, `bwl-gear-check`, `aq40-gear-check` or `naxx-gear-check`."#
        )
    }
}

fn require_admin(message: &IncomingMessage) -> Result<(), CommandRejection> {
    if message.author_is_admin {
        Ok(())
    } else {
        Err(CommandRejection::NotAdmin)
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::bridge::platform::testing::{FakePlatform, Sent};
    use crate::store::MemoryStore;

    const DEST_GUILD: u64 = 100;
    const DEST_CHANNEL: u64 = 42;
    const SOURCE_GUILD: u64 = 200;
    const SOURCE_CHANNEL: u64 = 301;
    const ROLE: u64 = 555;

    fn setup() -> (Arc<MemoryStore>, ConfigRepository, CommandHandler) {
        let store = Arc::new(MemoryStore::new());
        let repository = ConfigRepository::new(store.clone(), "");
        let handler = CommandHandler::new(repository.clone(), "tog.");
        (store, repository, handler)
    }

    fn platform() -> FakePlatform {
        FakePlatform::new()
            .with_channel(DEST_GUILD, DEST_CHANNEL)
            .with_channel(SOURCE_GUILD, SOURCE_CHANNEL)
            .with_role(DEST_GUILD, ROLE)
            .with_role(DEST_GUILD, ROLE + 1)
    }

    fn message(content: &str, admin: bool) -> IncomingMessage {
        IncomingMessage {
            message_id: 1,
            guild_id: DEST_GUILD,
            channel_id: DEST_CHANNEL,
            channel_name: "officer-chat".to_string(),
            author_id: 9,
            author_display_name: "Officer".to_string(),
            content: content.to_string(),
            author_is_admin: admin,
            ..Default::default()
        }
    }

    async fn run(handler: &CommandHandler, platform: &FakePlatform, content: &str) -> String {
        handler
            .handle_command(platform, &message(content, true))
            .await
            .expect("message is a command")
    }

    #[test]
    fn test_parse_setup_gear_check() {
        let command = parse_command("tog.", "tog.setup_gear_check 806389180162506802 Bloodsail Buccaneers")
            .unwrap()
            .unwrap();
        assert_eq!(
            command,
            BotCommand::SetupGearCheck {
                source_guild_id: 806389180162506802,
                realm: "Bloodsail Buccaneers".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_mentions_and_optional_role() {
        assert_eq!(
            parse_command("tog.", "tog.setup_buff_alerts <#301> <@&555>").unwrap().unwrap(),
            BotCommand::SetupBuffAlerts {
                source_channel_id: 301,
                role_id: Some(555),
            }
        );
        assert_eq!(
            parse_command("tog.", "tog.setup_buff_alerts 301").unwrap().unwrap(),
            BotCommand::SetupBuffAlerts {
                source_channel_id: 301,
                role_id: None,
            }
        );
        assert_eq!(
            parse_command("tog.", "TOG.help").map(|r| r.is_ok()),
            None,
            "prefix is case sensitive"
        );
        assert_eq!(parse_command("tog.", "tog.HELP").unwrap().unwrap(), BotCommand::Help);
    }

    #[test]
    fn test_parse_rejects_bad_arguments() {
        for content in [
            "tog.setup_gear_check",
            "tog.setup_gear_check 123",
            "tog.setup_gear_check abc Faerlina",
            "tog.setup_gear_check 0 Faerlina",
            "tog.remove_gear_check",
            "tog.remove_gear_check 1 2",
            "tog.setup_buff_alerts x",
            "tog.setup_buff_alerts 1 2 3",
            "tog.remove_buff_alerts",
        ] {
            match parse_command("tog.", content) {
                Some(Err(CommandRejection::Usage(usage))) => assert!(usage.starts_with("tog.")),
                other => panic!("{} parsed as {:?}", content, other.map(|r| r.is_ok())),
            }
        }
    }

    #[test]
    fn test_parse_ignores_non_commands() {
        assert!(parse_command("tog.", "hello there").is_none());
        assert!(parse_command("tog.", "tog.unknown_thing 1").is_none());
        assert!(parse_command("tog.", "tog.").is_none());
    }

    #[tokio::test]
    async fn test_setup_gear_check_writes_both_sides_once() {
        let (store, repository, handler) = setup();
        let platform = platform();

        let reply = run(&handler, &platform, "tog.setup_gear_check 200 Faerlina").await;
        assert!(reply.contains("<#42>"), "{}", reply);
        assert_eq!(store.write_count().await, 1);

        let destination = repository.get_or_create_config(DEST_GUILD).await.unwrap();
        let binding = destination.destination_config.gear_check_source(SOURCE_GUILD).unwrap();
        assert_eq!(binding.destination_channel_id, DEST_CHANNEL);
        assert_eq!(binding.realm, "Faerlina");

        let source = repository.get_or_create_config(SOURCE_GUILD).await.unwrap();
        assert_eq!(source.source_config.gear_check_infos.len(), 1);
        assert_eq!(source.source_config.gear_check_infos[0].destination_guild_id, DEST_GUILD);
    }

    #[tokio::test]
    async fn test_setup_gear_check_twice_is_rejected() {
        let (store, _, handler) = setup();
        let platform = platform();

        run(&handler, &platform, "tog.setup_gear_check 200 Faerlina").await;
        let reply = run(&handler, &platform, "tog.setup_gear_check 200 Faerlina").await;
        assert!(reply.contains("already set up"), "{}", reply);
        assert_eq!(store.write_count().await, 1);
    }

    #[tokio::test]
    async fn test_setup_gear_check_same_guild() {
        let (store, repository, handler) = setup();
        let platform = platform();

        run(&handler, &platform, "tog.setup_gear_check 100 Faerlina").await;
        assert_eq!(store.write_count().await, 1);

        let config = repository.get_or_create_config(DEST_GUILD).await.unwrap();
        assert!(config.destination_config.gear_check_source(DEST_GUILD).is_some());
        assert_eq!(config.source_config.gear_check_infos.len(), 1);
    }

    #[tokio::test]
    async fn test_setup_gear_check_requires_access_and_admin() {
        let (store, _, handler) = setup();
        let platform = platform();

        let reply = run(&handler, &platform, "tog.setup_gear_check 999 Faerlina").await;
        assert!(reply.contains("can't access server 999"), "{}", reply);

        let reply = handler
            .handle_command(&platform, &message("tog.setup_gear_check 200 Faerlina", false))
            .await
            .unwrap();
        assert!(reply.contains("administrators"), "{}", reply);
        assert_eq!(store.write_count().await, 0);
    }

    #[tokio::test]
    async fn test_remove_gear_check() {
        let (_, repository, handler) = setup();
        let platform = platform();

        let reply = run(&handler, &platform, "tog.remove_gear_check 200").await;
        assert!(reply.contains("not set up"), "{}", reply);

        run(&handler, &platform, "tog.setup_gear_check 200 Faerlina").await;
        run(&handler, &platform, "tog.remove_gear_check 200").await;

        let destination = repository.get_or_create_config(DEST_GUILD).await.unwrap();
        let source = repository.get_or_create_config(SOURCE_GUILD).await.unwrap();
        assert!(destination.is_empty());
        assert!(source.is_empty());
    }

    #[tokio::test]
    async fn test_setup_buff_alerts_with_role() {
        let (_, repository, handler) = setup();
        let platform = platform();

        let reply = run(&handler, &platform, "tog.setup_buff_alerts 301 555").await;
        assert!(reply.contains("<@&555>"), "{}", reply);

        let destination = repository.get_or_create_config(DEST_GUILD).await.unwrap();
        assert_eq!(destination.buff_alert_role_id, Some(ROLE));
        let binding = destination.destination_config.buff_alert_source(SOURCE_CHANNEL).unwrap();
        assert_eq!(binding.destination_channel_id, DEST_CHANNEL);

        let source = repository.get_or_create_config(SOURCE_GUILD).await.unwrap();
        let mirrored = &source.source_config.buff_alert_infos;
        assert_eq!(mirrored.len(), 1);
        assert_eq!(mirrored[0].source_channel_id, SOURCE_CHANNEL);
        assert_eq!(mirrored[0].destination_guild_id, DEST_GUILD);
    }

    #[tokio::test]
    async fn test_setup_buff_alerts_rejections() {
        let (store, _, handler) = setup();
        let platform = platform().with_channel(SOURCE_GUILD, SOURCE_CHANNEL + 1);

        let reply = run(&handler, &platform, "tog.setup_buff_alerts 999").await;
        assert!(reply.contains("can't access channel 999"), "{}", reply);

        let reply = run(&handler, &platform, "tog.setup_buff_alerts 301 777").await;
        assert!(reply.contains("Role 777"), "{}", reply);
        assert_eq!(store.write_count().await, 0);

        run(&handler, &platform, "tog.setup_buff_alerts 301 555").await;

        let reply = run(&handler, &platform, "tog.setup_buff_alerts 301").await;
        assert!(reply.contains("already set up"), "{}", reply);

        let reply = run(&handler, &platform, "tog.setup_buff_alerts 302 556").await;
        assert!(reply.contains("already ping <@&555>"), "{}", reply);

        let reply = run(&handler, &platform, "tog.setup_buff_alerts 302").await;
        assert!(reply.contains("via <#301>"), "{}", reply);
        assert_eq!(store.write_count().await, 1);
    }

    #[tokio::test]
    async fn test_removing_last_buff_alert_frees_the_role() {
        let (_, repository, handler) = setup();
        let platform = platform();

        run(&handler, &platform, "tog.setup_buff_alerts 301 555").await;
        run(&handler, &platform, "tog.remove_buff_alerts 301").await;
        let destination = repository.get_or_create_config(DEST_GUILD).await.unwrap();
        assert_eq!(destination.buff_alert_role_id, None);

        let reply = run(&handler, &platform, "tog.setup_buff_alerts 301 556").await;
        assert!(reply.contains("<@&556>"), "{}", reply);
        let destination = repository.get_or_create_config(DEST_GUILD).await.unwrap();
        assert_eq!(destination.buff_alert_role_id, Some(ROLE + 1));
    }

    #[tokio::test]
    async fn test_remove_buff_alerts() {
        let (_, repository, handler) = setup();
        let platform = platform();

        run(&handler, &platform, "tog.setup_buff_alerts 301").await;
        let reply = run(&handler, &platform, "tog.remove_buff_alerts 301").await;
        assert!(reply.contains("no longer"), "{}", reply);

        assert!(repository
            .get_or_create_config(DEST_GUILD)
            .await
            .unwrap()
            .destination_config
            .is_empty());
        assert!(repository.get_or_create_config(SOURCE_GUILD).await.unwrap().is_empty());

        let reply = run(&handler, &platform, "tog.remove_buff_alerts 301").await;
        assert!(reply.contains("not set up"), "{}", reply);
    }

    #[tokio::test]
    async fn test_remove_buff_alerts_for_unreachable_channel() {
        let (_, repository, handler) = setup();
        run(&handler, &platform(), "tog.setup_buff_alerts 301").await;

        // The bot has since lost access to the source server.
        let platform = FakePlatform::new().with_channel(DEST_GUILD, DEST_CHANNEL);
        let reply = run(&handler, &platform, "tog.remove_buff_alerts 301").await;
        assert!(reply.contains("couldn't reach"), "{}", reply);

        let destination = repository.get_or_create_config(DEST_GUILD).await.unwrap();
        assert!(destination.destination_config.buff_alert_source(SOURCE_CHANNEL).is_none());
        let source = repository.get_or_create_config(SOURCE_GUILD).await.unwrap();
        assert!(source.source_config.has_buff_alert_destination(DEST_GUILD));
    }

    #[tokio::test]
    async fn test_buff_me_and_debuff_me() {
        let (_, _, handler) = setup();
        let platform = platform();

        let reply = run(&handler, &platform, "tog.buff_me").await;
        assert!(reply.contains("No buff alert role"), "{}", reply);

        run(&handler, &platform, "tog.setup_buff_alerts 301 555").await;

        let reply = handler
            .handle_command(&platform, &message("tog.buff_me", false))
            .await
            .unwrap();
        assert!(reply.starts_with("<@9>"), "{}", reply);
        run(&handler, &platform, "tog.debuff_me").await;

        assert_eq!(
            platform.sent(),
            vec![
                Sent::AddRole {
                    guild_id: DEST_GUILD,
                    user_id: 9,
                    role_id: ROLE
                },
                Sent::RemoveRole {
                    guild_id: DEST_GUILD,
                    user_id: 9,
                    role_id: ROLE
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_usage_and_help_replies() {
        let (_, _, handler) = setup();
        let platform = platform();

        let reply = run(&handler, &platform, "tog.remove_gear_check").await;
        assert_eq!(reply, "Usage: `tog.remove_gear_check <source_server_id>`");

        let reply = run(&handler, &platform, "tog.help").await;
        assert!(reply.contains("tog.setup_gear_check"));
        assert!(reply.contains("tog.debuff_me"));

        assert!(handler
            .handle_command(&platform, &message("just chatting", true))
            .await
            .is_none());
    }
}
