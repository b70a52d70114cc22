//! Character name scraping from gear planner pages.
//!
//! Sixty Upgrades renders the character name in an `<h3>` whose class starts
//! with `class-` (e.g. `class-warrior`). The first load of a set page
//! sometimes comes back without it, so fetching is retried.

use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use fancy_regex::Regex;
use tracing::{debug, warn};

use crate::common::error::{LookupError, LookupResult};
use crate::gear::links::{GearLink, GearSite};
use crate::gear::CharacterNameSource;

/// Scrapes character names from Sixty Upgrades pages.
#[derive(Debug, Clone)]
pub struct SixtyUpgradesScraper {
    http: reqwest::Client,
    max_attempts: usize,
    min_delay: Duration,
    max_delay: Duration,
    heading_pattern: Regex,
    tag_pattern: Regex,
}

impl SixtyUpgradesScraper {
    pub fn new(http: reqwest::Client, max_attempts: usize) -> Self {
        Self {
            http,
            max_attempts: max_attempts.max(1),
            min_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            heading_pattern: Regex::new(
                r#"(?is)<h3\b[^>]*\bclass\s*=\s*["']class-[^"']*["'][^>]*>(.*?)</h3>"#,
            )
            .expect("valid heading pattern"),
            tag_pattern: Regex::new(r"<[^>]*>").expect("valid tag pattern"),
        }
    }

    #[cfg(test)]
    pub fn with_delays(mut self, min_delay: Duration, max_delay: Duration) -> Self {
        self.min_delay = min_delay;
        self.max_delay = max_delay;
        self
    }

    /// Pull the character name out of page markup.
    pub fn extract_character_name(&self, html: &str) -> Option<String> {
        let captures = self.heading_pattern.captures(html).ok().flatten()?;
        let inner = captures.get(1)?.as_str();
        let text = self.tag_pattern.replace_all(inner, "");
        let name = decode_entities(text.trim());
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    async fn fetch_once(&self, url: &str) -> LookupResult<String> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        self.extract_character_name(&body)
            .ok_or_else(|| LookupError::NameNotFound {
                url: url.to_string(),
            })
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_factor(2.0)
            .with_jitter()
            .with_max_times(self.max_attempts - 1)
    }
}

#[async_trait]
impl CharacterNameSource for SixtyUpgradesScraper {
    async fn fetch_character_name(&self, link: &GearLink) -> Option<String> {
        if link.site != GearSite::SixtyUpgrades {
            return None;
        }

        let url = link.url.as_str();
        let result = (|| self.fetch_once(url))
            .retry(self.backoff())
            .when(LookupError::is_transient)
            .notify(|e: &LookupError, delay: Duration| {
                warn!(
                    "Character name fetch from {} failed: {}. Retrying in {:.1}s",
                    url,
                    e,
                    delay.as_secs_f64()
                );
            })
            .await;

        match result {
            Ok(name) => {
                debug!("Scraped character name '{}' from {}", name, url);
                Some(name)
            }
            Err(e) => {
                warn!(
                    "Giving up on character name from {} after {} attempts: {}",
                    url, self.max_attempts, e
                );
                None
            }
        }
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    fn scraper() -> SixtyUpgradesScraper {
        SixtyUpgradesScraper::new(reqwest::Client::new(), 2)
            .with_delays(Duration::ZERO, Duration::ZERO)
    }

    #[test]
    fn test_extract_character_name() {
        let html = r#"<div><h2>Set</h2><h3 class="class-warrior title">Grommash</h3></div>"#;
        assert_eq!(scraper().extract_character_name(html), Some("Grommash".to_string()));
    }

    #[test]
    fn test_extract_first_matching_heading() {
        let html = r#"
            <h3 class="subtitle">Not this</h3>
            <h3 data-x="1" class='class-priest'>
                <span>Anduin</span>
            </h3>
            <h3 class="class-mage">Jaina</h3>"#;
        assert_eq!(scraper().extract_character_name(html), Some("Anduin".to_string()));
    }

    #[test]
    fn test_extract_missing_name() {
        assert_eq!(scraper().extract_character_name("<html></html>"), None);
        assert_eq!(
            scraper().extract_character_name(r#"<h3 class="class-rogue">  </h3>"#),
            None
        );
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("Zul&#39;jin &amp; co"), "Zul'jin & co");
    }

    #[tokio::test]
    async fn test_non_sixty_upgrades_link_is_not_fetched() {
        let link = GearLink {
            url: "https://classic.wowhead.com/gear-planner/mage/gnome/xx".to_string(),
            site: GearSite::WowheadClassic,
            private: false,
        };
        assert_eq!(scraper().fetch_character_name(&link).await, None);
    }

    /// Serve every request with `status` and count the requests.
    async fn serve_status(status: &'static str) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/set/abcdef", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                let mut buf = [0_u8; 2048];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                    status
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        (url, hits)
    }

    fn sixty_upgrades_link(url: String) -> GearLink {
        GearLink {
            url,
            site: GearSite::SixtyUpgrades,
            private: false,
        }
    }

    #[tokio::test]
    async fn test_missing_page_is_not_retried() {
        let (url, hits) = serve_status("404 Not Found").await;
        let scraper = SixtyUpgradesScraper::new(reqwest::Client::new(), 3)
            .with_delays(Duration::ZERO, Duration::ZERO);

        assert_eq!(scraper.fetch_character_name(&sixty_upgrades_link(url)).await, None);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_server_errors_are_retried() {
        let (url, hits) = serve_status("503 Service Unavailable").await;
        let scraper = SixtyUpgradesScraper::new(reqwest::Client::new(), 3)
            .with_delays(Duration::ZERO, Duration::ZERO);

        assert_eq!(scraper.fetch_character_name(&sixty_upgrades_link(url)).await, None);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_transient_lookup_errors() {
        let status = |status| LookupError::Status {
            status,
            url: "u".to_string(),
        };
        assert!(!status(404).is_transient());
        assert!(!status(403).is_transient());
        assert!(status(429).is_transient());
        assert!(status(502).is_transient());
        assert!(LookupError::NameNotFound { url: "u".to_string() }.is_transient());
    }
}
