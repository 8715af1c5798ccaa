//! Plain HTTP secondary source fetcher.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::AcquisitionError;
use crate::profile::extract::extract_visible_text;
use crate::profile::fetcher::StaticPageFetcher;

/// Generic user agent sent to the secondary source.
const GENERIC_USER_AGENT: &str = "Mozilla/5.0";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches static pages with reqwest.
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new() -> Result<Self, AcquisitionError> {
        let client = reqwest::Client::builder()
            .user_agent(GENERIC_USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AcquisitionError::Http {
                url: String::new(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl StaticPageFetcher for HttpPageFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, AcquisitionError> {
        let http_err = |reason: String| AcquisitionError::Http {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| http_err(e.to_string()))?;
        let status = response.status();
        info!(url, status = status.as_u16(), "Fetched secondary source");

        let body = response
            .error_for_status()
            .map_err(|e| http_err(e.to_string()))?
            .text()
            .await
            .map_err(|e| http_err(format!("reading body failed: {e}")))?;
        debug!(bytes = body.len(), "Secondary source body received");

        extract_visible_text(&body)
    }
}
