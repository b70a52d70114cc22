//! Warcraft Logs character parse lookup.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::common::error::{LookupError, LookupResult};
use crate::config::types::WarcraftLogsConfig;
use crate::gear::RaidLogSource;

/// Client for the Warcraft Logs v1 parses endpoint.
#[derive(Debug, Clone)]
pub struct WarcraftLogsClient {
    http: reqwest::Client,
    api_base: String,
    public_base: String,
    region: String,
    token: String,
}

impl WarcraftLogsClient {
    pub fn new(http: reqwest::Client, config: &WarcraftLogsConfig) -> Self {
        Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            public_base: config.public_base.trim_end_matches('/').to_string(),
            region: config.region.clone(),
            token: config.token.clone(),
        }
    }

    /// API url for a character's parses, without the query string.
    pub fn parses_url(&self, character_name: &str, realm: &str) -> String {
        format!(
            "{}/parses/character/{}/{}/{}",
            self.api_base,
            character_name,
            realm_slug(realm),
            self.region
        )
    }

    /// Public character page shown to officers.
    pub fn character_url(&self, zone_id: u32, character_name: &str, realm: &str) -> String {
        format!(
            "{}/character/{}/{}/{}?zone={}",
            self.public_base,
            self.region.to_lowercase(),
            realm_slug(realm),
            character_name,
            zone_id
        )
    }

    async fn check_parses(&self, zone_id: u32, character_name: &str, realm: &str) -> LookupResult<()> {
        let url = self.parses_url(character_name, realm);
        let response = self
            .http
            .get(&url)
            .query(&[("zone", zone_id.to_string()), ("api_key", self.token.clone())])
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(LookupError::Status {
                status: status.as_u16(),
                url,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RaidLogSource for WarcraftLogsClient {
    async fn fetch_raid_log_url(
        &self,
        zone_id: u32,
        character_name: &str,
        realm: &str,
    ) -> Option<String> {
        match self.check_parses(zone_id, character_name, realm).await {
            Ok(()) => {
                debug!("Found logs for {} on {} in zone {}", character_name, realm, zone_id);
                Some(self.character_url(zone_id, character_name, realm))
            }
            Err(e) => {
                warn!(
                    "Raid logs lookup failed for {} on {} (zone {}): {}",
                    character_name, realm, zone_id, e
                );
                None
            }
        }
    }
}

/// Warcraft Logs realm slug: lowercase, spaces as dashes, no apostrophes.
pub fn realm_slug(realm: &str) -> String {
    realm
        .trim()
        .to_lowercase()
        .replace('\'', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> WarcraftLogsClient {
        WarcraftLogsClient::new(reqwest::Client::new(), &WarcraftLogsConfig::default())
    }

    #[test]
    fn test_realm_slug() {
        assert_eq!(realm_slug("Faerlina"), "faerlina");
        assert_eq!(realm_slug(" Bloodsail Buccaneers "), "bloodsail-buccaneers");
        assert_eq!(realm_slug("Zul'jin"), "zuljin");
    }

    #[test]
    fn test_urls() {
        let client = client();
        assert_eq!(
            client.parses_url("Thrall", "Faerlina"),
            "https://classic.warcraftlogs.com:443/v1/parses/character/Thrall/faerlina/US"
        );
        assert_eq!(
            client.character_url(1002, "Thrall", "Faerlina"),
            "https://classic.warcraftlogs.com/character/us/faerlina/Thrall?zone=1002"
        );
    }
}
