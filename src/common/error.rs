//! Error types for the application.

use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Discord error: {0}")]
    Discord(#[from] DiscordError),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {message}")]
    ParseError { message: String },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },

    #[error("Missing required secret: {name}")]
    MissingSecret { name: String },
}

/// Key-value store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Stored value for '{key}' is not valid UTF-8")]
    InvalidUtf8 { key: String },
}

/// Errors decoding a stored guild configuration.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Malformed guild configuration: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unsupported guild configuration version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Guild configuration is stored under {stored} but was read for {requested}")]
    GuildMismatch { stored: u64, requested: u64 },
}

/// External lookup errors (gear planner pages, leaderboard).
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Character name not found on {url}")]
    NameNotFound { url: String },
}

impl LookupError {
    /// Whether another attempt could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => !e.is_builder(),
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            // Set pages sometimes render before the character is filled in.
            Self::NameNotFound { .. } => true,
        }
    }
}

/// Discord-related errors.
#[derive(Debug, Error)]
pub enum DiscordError {
    #[error("Invalid Discord id: {0}")]
    InvalidId(u64),

    #[error("Serenity error: {0}")]
    Serenity(#[from] serenity::Error),
}

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type alias for lookups.
pub type LookupResult<T> = std::result::Result<T, LookupError>;

/// Result type alias for Discord operations.
pub type DiscordResult<T> = std::result::Result<T, DiscordError>;
