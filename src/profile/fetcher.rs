//! Source abstractions for profile acquisition.

use async_trait::async_trait;

use crate::error::AcquisitionError;
use crate::profile::model::PrimaryProfile;

/// A page that only renders its content client-side.
///
/// Implementations own the whole browser session for one call and must
/// release it before returning, success or not.
#[async_trait]
pub trait DynamicPageFetcher: Send + Sync {
    /// Render `url` and extract the primary profile fields.
    async fn fetch_profile(&self, url: &str) -> Result<PrimaryProfile, AcquisitionError>;
}

/// A plain HTML page reachable with an unauthenticated GET.
#[async_trait]
pub trait StaticPageFetcher: Send + Sync {
    /// Fetch `url` and return its visible text.
    async fn fetch_text(&self, url: &str) -> Result<String, AcquisitionError>;
}
