//! TOG Helper - gear check and world buff relay for Discord
//!
//! Forwards gear check requests from recruitment servers to officer channels,
//! enriched with the character's raid logs, and fans out world buff alerts
//! to subscribed servers.

mod bridge;
mod common;
mod config;
mod discord;
mod gear;
mod model;
mod store;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::signal;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use bridge::Bridge;
use common::error::{AppError, ConfigError};
use config::{env::get_config_path, load_and_validate};
use discord::{CommandHandler, DiscordBotBuilder};
use gear::{SixtyUpgradesScraper, WarcraftLogsClient};
use store::{ConfigRepository, ConfigStore, MemoryStore, RedisStore};

/// Store keys holding secrets in deployments that keep them next to the
/// guild configurations.
const DISCORD_TOKEN_KEY: &str = "TOG_BOT_AUTH_TOKEN";
const WCL_TOKEN_KEY: &str = "WCL_TOKEN";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("TOG Helper v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_path = get_config_path();
    info!("Loading configuration from {}...", config_path);

    let mut config = load_and_validate(&config_path).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        error!("Please ensure {} exists and is properly formatted.", config_path);
        e
    })?;

    info!("Configuration loaded successfully");
    info!("  Store: {}", config.store.url);
    info!("  Command prefix: {}", config.discord.command_prefix);
    info!("  Warcraft Logs region: {}", config.warcraft_logs.region);

    // ============================================================
    // Storage and secrets
    // ============================================================
    let (store, redis): (Arc<dyn ConfigStore>, Option<RedisStore>) = if config.store.is_memory() {
        warn!("Using the in-memory store, configuration changes will be lost on exit");
        (Arc::new(MemoryStore::new()) as Arc<dyn ConfigStore>, None)
    } else {
        let redis = RedisStore::open(&config.store.url).map_err(AppError::from)?;
        (Arc::new(redis.clone()) as Arc<dyn ConfigStore>, Some(redis))
    };

    config.discord.token =
        resolve_secret(&config.discord.token, redis.as_ref(), DISCORD_TOKEN_KEY, "discord.token").await?;
    config.warcraft_logs.token =
        resolve_secret(&config.warcraft_logs.token, redis.as_ref(), WCL_TOKEN_KEY, "warcraft_logs.token")
            .await?;

    let repository = ConfigRepository::new(store, config.store.key_prefix.clone());

    // ============================================================
    // Lookups and forwarding
    // ============================================================
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.gear_check.http_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .build()?;

    let scraper = SixtyUpgradesScraper::new(http.clone(), config.gear_check.max_fetch_attempts);
    let warcraft_logs = WarcraftLogsClient::new(http, &config.warcraft_logs);
    let bridge = Arc::new(Bridge::new(
        repository.clone(),
        Arc::new(scraper),
        Arc::new(warcraft_logs),
        &config.gear_check,
    ));
    let commands = CommandHandler::new(repository, config.discord.command_prefix.clone());

    // ============================================================
    // Start Discord bot
    // ============================================================
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let discord_bot = DiscordBotBuilder::new(config.discord.token.clone(), commands, bridge, shutdown_rx)
        .build()
        .await?;

    info!("Starting Discord bot...");
    let mut discord_task = tokio::spawn(discord_bot.run());

    let shutdown = tokio::select! {
        biased;
        _ = shutdown_signal() => {
            info!("Shutdown signal received - disconnecting from Discord...");
            true
        }
        _ = &mut discord_task => false,
    };

    if shutdown {
        if let Err(e) = shutdown_tx.send(true) {
            debug!("Shutdown channel closed (Discord task already exited): {}", e);
        }
        match tokio::time::timeout(Duration::from_secs(5), discord_task).await {
            Ok(Ok(())) => info!("Discord client stopped gracefully"),
            Ok(Err(e)) => warn!("Discord task panicked: {}", e),
            Err(_) => warn!("Discord shutdown timed out"),
        }
    }

    info!("Exiting...");
    Ok(())
}

/// Use the configured secret, falling back to the store when it is empty.
async fn resolve_secret(
    configured: &str,
    redis: Option<&RedisStore>,
    key: &str,
    name: &str,
) -> Result<String, AppError> {
    if !configured.is_empty() {
        return Ok(configured.to_string());
    }

    if let Some(redis) = redis {
        match redis.get_string(key).await? {
            Some(value) if !value.trim().is_empty() => {
                info!("Loaded {} from store key {}", name, key);
                return Ok(value.trim().to_string());
            }
            _ => debug!("Store key {} is not set", key),
        }
    }

    Err(ConfigError::MissingSecret {
        name: name.to_string(),
    }
    .into())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
