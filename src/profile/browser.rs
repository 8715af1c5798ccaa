//! WebDriver-backed primary source fetcher.

use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use crate::config::BrowserConfig;
use crate::error::AcquisitionError;
use crate::profile::extract::{PROFILE_ANCHOR_ID, parse_primary_profile};
use crate::profile::fetcher::DynamicPageFetcher;
use crate::profile::model::PrimaryProfile;

/// Drives a headless browser through a WebDriver endpoint.
pub struct WebDriverFetcher {
    config: BrowserConfig,
}

impl WebDriverFetcher {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    /// Session capabilities: headless, sandbox off, desktop user agent.
    pub fn capabilities(&self) -> Map<String, Value> {
        let mut caps = Map::new();
        caps.insert(
            "browserName".to_string(),
            json!(self.config.kind.browser_name()),
        );
        caps.insert(
            self.config.kind.options_key().to_string(),
            json!({
                "args": [
                    "--headless",
                    "--no-sandbox",
                    "--disable-dev-shm-usage",
                    "--disable-gpu",
                    format!("user-agent={}", self.config.user_agent),
                ]
            }),
        );
        caps
    }

    async fn scrape(&self, client: &Client, url: &str) -> Result<PrimaryProfile, AcquisitionError> {
        client
            .goto(url)
            .await
            .map_err(|e| AcquisitionError::Browser(format!("navigation to {url} failed: {e}")))?;

        client
            .wait()
            .at_most(self.config.anchor_wait)
            .for_element(Locator::Id(PROFILE_ANCHOR_ID))
            .await
            .map_err(|e| AcquisitionError::AnchorTimeout {
                anchor: PROFILE_ANCHOR_ID.to_string(),
                reason: e.to_string(),
            })?;

        tokio::time::sleep(self.config.settle_delay).await;

        let html = client
            .source()
            .await
            .map_err(|e| AcquisitionError::Browser(format!("reading page source failed: {e}")))?;
        debug!(bytes = html.len(), "Rendered primary profile page");

        parse_primary_profile(&html)
    }
}

#[async_trait]
impl DynamicPageFetcher for WebDriverFetcher {
    async fn fetch_profile(&self, url: &str) -> Result<PrimaryProfile, AcquisitionError> {
        let mut builder = ClientBuilder::native();
        builder.capabilities(self.capabilities());
        let client = builder
            .connect(&self.config.webdriver_url)
            .await
            .map_err(|e| {
                AcquisitionError::Browser(format!(
                    "could not start session at {}: {e}",
                    self.config.webdriver_url
                ))
            })?;

        info!(url, "Browser session started");
        let result = self.scrape(&client, url).await;

        // The session is closed on every path, including scrape errors.
        if let Err(e) = client.close().await {
            warn!(error = %e, "Failed to close browser session");
        }

        result
    }
}
