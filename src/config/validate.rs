//! Configuration validation.
//!
//! Validates configuration values and provides helpful error messages.

use crate::common::error::ConfigError;
use crate::config::types::Config;

/// Validate a configuration and return detailed errors.
///
/// Tokens are not checked here; they can still arrive from the store after
/// the file has been validated.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    // Discord
    let prefix = &config.discord.command_prefix;
    if prefix.trim().is_empty() {
        errors.push("discord.command_prefix is required".to_string());
    } else if prefix.len() > 16 {
        errors.push(format!(
            "discord.command_prefix must be at most 16 characters (got {})",
            prefix.len()
        ));
    }
    if config.discord.token == "YOUR_DISCORD_TOKEN_HERE" {
        errors.push("discord.token has not been configured (still using placeholder)".to_string());
    }

    // Store
    let url = &config.store.url;
    if !(url.starts_with("redis://") || url.starts_with("rediss://") || config.store.is_memory()) {
        errors.push(format!(
            "store.url '{}' must start with redis://, rediss:// or memory://",
            url
        ));
    }
    if config.store.key_prefix.contains(char::is_whitespace) {
        errors.push("store.key_prefix must not contain whitespace".to_string());
    }

    // Warcraft Logs
    for (field, value) in [
        ("warcraft_logs.api_base", &config.warcraft_logs.api_base),
        ("warcraft_logs.public_base", &config.warcraft_logs.public_base),
    ] {
        if !(value.starts_with("http://") || value.starts_with("https://")) {
            errors.push(format!("{} '{}' must be an http(s) URL", field, value));
        }
    }
    if config.warcraft_logs.region.trim().is_empty() {
        errors.push("warcraft_logs.region is required".to_string());
    }

    // Gear check
    let attempts = config.gear_check.max_fetch_attempts;
    if !(1..=10).contains(&attempts) {
        errors.push(format!(
            "gear_check.max_fetch_attempts must be 1-10 (got {})",
            attempts
        ));
    }
    if config.gear_check.http_timeout_secs == 0 {
        errors.push("gear_check.http_timeout_secs must be non-zero".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            message: errors.join("\n"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_valid_config() -> Config {
        let mut config = Config::default();
        config.discord.token = "valid_token_here".to_string();
        config.warcraft_logs.token = "wcl".to_string();
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&make_valid_config()).is_ok());
    }

    #[test]
    fn test_memory_store_allowed() {
        let mut config = make_valid_config();
        config.store.url = "memory://".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_placeholder_token_fails() {
        let mut config = make_valid_config();
        config.discord.token = "YOUR_DISCORD_TOKEN_HERE".to_string();

        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("placeholder"));
    }

    #[test]
    fn test_empty_prefix_fails() {
        let mut config = make_valid_config();
        config.discord.command_prefix = "  ".to_string();

        let result = validate_config(&config);
        assert!(result.unwrap_err().to_string().contains("command_prefix"));
    }

    #[test]
    fn test_bad_store_url_fails() {
        let mut config = make_valid_config();
        config.store.url = "postgres://db".to_string();

        let result = validate_config(&config);
        assert!(result.unwrap_err().to_string().contains("store.url"));
    }

    #[test]
    fn test_errors_are_collected() {
        let mut config = make_valid_config();
        config.gear_check.max_fetch_attempts = 0;
        config.warcraft_logs.api_base = "ftp://nope".to_string();

        let message = validate_config(&config).unwrap_err().to_string();
        assert!(message.contains("max_fetch_attempts"));
        assert!(message.contains("api_base"));
    }
}
