//! Environment variable overrides for configuration.
//!
//! Supports overriding config values with environment variables:
//! - `TOG_HELPER_DISCORD_TOKEN` - Discord bot token
//! - `TOG_HELPER_WCL_TOKEN` - Warcraft Logs API key
//! - `TOG_HELPER_REDIS_URL` - Store URL
//! - `TOG_HELPER_COMMAND_PREFIX` - Chat command prefix

use std::env;

use crate::config::types::Config;

/// Environment variable prefix for all config overrides.
const ENV_PREFIX: &str = "TOG_HELPER";

/// Apply environment variable overrides to a config.
///
/// This allows sensitive values like tokens to be provided via environment
/// variables instead of the config file.
pub fn apply_env_overrides(config: Config) -> Config {
    apply_overrides_from(config, |name| env::var(name).ok())
}

/// Apply overrides using `lookup` to read variables.
pub fn apply_overrides_from(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
    let var = |suffix: &str| {
        lookup(&format!("{}_{}", ENV_PREFIX, suffix)).filter(|value| !value.is_empty())
    };

    if let Some(token) = var("DISCORD_TOKEN") {
        config.discord.token = token;
    }
    if let Some(token) = var("WCL_TOKEN") {
        config.warcraft_logs.token = token;
    }
    if let Some(url) = var("REDIS_URL") {
        config.store.url = url;
    }
    if let Some(prefix) = var("COMMAND_PREFIX") {
        config.discord.command_prefix = prefix;
    }

    config
}

/// Get the config file path from environment or use default.
///
/// Checks `TOG_HELPER_CONFIG` environment variable, otherwise returns "tog-helper.conf".
pub fn get_config_path() -> String {
    env::var(format!("{}_CONFIG", ENV_PREFIX)).unwrap_or_else(|_| "tog-helper.conf".to_string())
}
