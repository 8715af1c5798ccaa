//! Profile acquisition with primary-to-secondary fallback.

use std::sync::Arc;

use tracing::{info, warn};

use crate::profile::fetcher::{DynamicPageFetcher, StaticPageFetcher};
use crate::profile::model::ProfileRecord;

/// Builds a [`ProfileRecord`] from the primary source, falling back to the
/// secondary source only when the primary yields no interests and no
/// publications.
///
/// Never fails: every source error ends up in the record's `error` field.
pub struct ProfileAcquirer {
    primary: Arc<dyn DynamicPageFetcher>,
    secondary: Arc<dyn StaticPageFetcher>,
    secondary_url: String,
}

impl ProfileAcquirer {
    pub fn new(
        primary: Arc<dyn DynamicPageFetcher>,
        secondary: Arc<dyn StaticPageFetcher>,
        secondary_url: impl Into<String>,
    ) -> Self {
        Self {
            primary,
            secondary,
            secondary_url: secondary_url.into(),
        }
    }

    pub async fn acquire(&self, primary_url: &str) -> ProfileRecord {
        let record = match self.primary.fetch_profile(primary_url).await {
            Ok(profile) => ProfileRecord::from_primary(profile),
            Err(e) => {
                warn!(url = primary_url, error = %e, "Primary source failed");
                ProfileRecord::from_primary_error(&e)
            }
        };

        if record.has_primary_data() {
            info!(
                interests = record.interests.as_ref().map_or(0, Vec::len),
                publications = record.publications.as_ref().map_or(0, Vec::len),
                "Profile acquired from primary source"
            );
            return record;
        }

        warn!(
            url = %self.secondary_url,
            "Primary source returned no data, falling back to secondary source"
        );
        let outcome = self.secondary.fetch_text(&self.secondary_url).await;
        if let Err(e) = &outcome {
            warn!(error = %e, "Secondary source failed");
        }
        record.with_secondary(outcome)
    }
}
