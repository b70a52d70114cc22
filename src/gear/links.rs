//! Gear planner link detection.

use fancy_regex::Regex;
use tracing::warn;

/// Sites whose gear planner links are accepted in gear check channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GearSite {
    SixtyUpgrades,
    WowheadClassic,
}

impl GearSite {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SixtyUpgrades => "Sixty Upgrades",
            Self::WowheadClassic => "Wowhead",
        }
    }
}

/// A gear planner link found in a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GearLink {
    pub url: String,
    pub site: GearSite,
    /// Private Sixty Upgrades links (`/character/...`) only render for their owner.
    pub private: bool,
}

/// Finds the first supported gear link in a message.
#[derive(Debug, Clone)]
pub struct GearLinkMatcher {
    /// Patterns in priority order; each has a `url` capture group.
    patterns: Vec<(GearSite, Regex)>,
    private_pattern: Regex,
}

impl Default for GearLinkMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl GearLinkMatcher {
    pub fn new() -> Self {
        Self {
            patterns: vec![
                (
                    GearSite::SixtyUpgrades,
                    // 3+ chars after the slash so bare links to the site don't match
                    Regex::new(
                        r"(?P<url>https?://([^\s]+\.)?sixtyupgrades\.com/[a-zA-Z0-9]{3,}[^\s]+)",
                    )
                    .expect("valid Sixty Upgrades pattern"),
                ),
                (
                    GearSite::WowheadClassic,
                    Regex::new(r"(?P<url>https?://([^\s]+\.)?classic\.wowhead\.com/gear-planner/[^\s]+)")
                        .expect("valid Wowhead pattern"),
                ),
            ],
            private_pattern: Regex::new(r"^https?://([^\s]+\.)?sixtyupgrades\.com/character/[^\s]+")
                .expect("valid private link pattern"),
        }
    }

    /// Return the first link matched by the highest-priority pattern.
    pub fn find(&self, content: &str) -> Option<GearLink> {
        self.patterns.iter().find_map(|(site, regex)| {
            let captures = match regex.captures(content) {
                Ok(captures) => captures?,
                Err(e) => {
                    warn!("Gear link match error for {}: {}", site.name(), e);
                    return None;
                }
            };
            let url = captures.name("url")?.as_str().to_string();
            let private = *site == GearSite::SixtyUpgrades
                && self.private_pattern.is_match(&url).unwrap_or(false);
            Some(GearLink {
                url,
                site: *site,
                private,
            })
        })
    }
}
