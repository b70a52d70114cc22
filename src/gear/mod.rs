//! Gear check lookups: link detection, character scraping, raid logs.

pub mod links;
pub mod scraper;
pub mod warcraft_logs;

use async_trait::async_trait;

pub use links::{GearLink, GearLinkMatcher, GearSite};
pub use scraper::SixtyUpgradesScraper;
pub use warcraft_logs::WarcraftLogsClient;

/// Best-effort character name lookup for a gear link.
#[async_trait]
pub trait CharacterNameSource: Send + Sync {
    /// `None` when the page is unsupported or the name could not be found.
    async fn fetch_character_name(&self, link: &GearLink) -> Option<String>;
}

/// Raid log lookup for a character.
#[async_trait]
pub trait RaidLogSource: Send + Sync {
    /// Public logs url, or `None` when the character has no logs.
    async fn fetch_raid_log_url(
        &self,
        zone_id: u32,
        character_name: &str,
        realm: &str,
    ) -> Option<String>;
}
