//! Configuration type definitions.

use serde::Deserialize;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub discord: DiscordConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub warcraft_logs: WarcraftLogsConfig,
    #[serde(default)]
    pub gear_check: GearCheckConfig,
}

/// Discord bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordConfig {
    /// Bot token. May be left empty and supplied by env or the store.
    #[serde(default)]
    pub token: String,
    /// Prefix for chat commands, e.g. `tog.help`.
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            command_prefix: default_command_prefix(),
        }
    }
}

/// Key-value store settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// `redis://...`, `rediss://...` or `memory://` for a throwaway in-process store.
    #[serde(default = "default_store_url")]
    pub url: String,
    /// Prepended to guild ids as `<prefix>:<id>`; empty stores under the bare id.
    #[serde(default)]
    pub key_prefix: String,
}

impl StoreConfig {
    pub fn is_memory(&self) -> bool {
        self.url.starts_with("memory://")
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: default_store_url(),
            key_prefix: String::new(),
        }
    }
}

/// Warcraft Logs API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct WarcraftLogsConfig {
    /// v1 API key. May be supplied by env or the store.
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_wcl_api_base")]
    pub api_base: String,
    #[serde(default = "default_wcl_public_base")]
    pub public_base: String,
    #[serde(default = "default_wcl_region")]
    pub region: String,
}

impl Default for WarcraftLogsConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_base: default_wcl_api_base(),
            public_base: default_wcl_public_base(),
            region: default_wcl_region(),
        }
    }
}

/// Gear check behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct GearCheckConfig {
    /// Attempts at scraping a character name before falling back.
    #[serde(default = "default_max_fetch_attempts")]
    pub max_fetch_attempts: usize,
    /// Remind posters to use Sixty Upgrades when they link another planner.
    #[serde(default = "default_true")]
    pub require_sixty_upgrades: bool,
    /// Timeout for page and API requests.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl Default for GearCheckConfig {
    fn default() -> Self {
        Self {
            max_fetch_attempts: default_max_fetch_attempts(),
            require_sixty_upgrades: true,
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

fn default_command_prefix() -> String {
    "tog.".to_string()
}

fn default_store_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_wcl_api_base() -> String {
    "https://classic.warcraftlogs.com:443/v1".to_string()
}

fn default_wcl_public_base() -> String {
    "https://classic.warcraftlogs.com".to_string()
}

fn default_wcl_region() -> String {
    "US".to_string()
}

fn default_max_fetch_attempts() -> usize {
    5
}

fn default_http_timeout_secs() -> u64 {
    15
}

fn default_true() -> bool {
    true
}
