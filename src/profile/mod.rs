//! Recipient profile acquisition.
//!
//! 1. `DynamicPageFetcher`: browser-rendered primary source
//! 2. `StaticPageFetcher`: plain HTML secondary source, used only as fallback
//! 3. `ProfileRecord::compose`: text handed to the generation stages

pub mod acquirer;
pub mod browser;
pub mod extract;
pub mod fetcher;
pub mod http;
pub mod model;

pub use acquirer::ProfileAcquirer;
pub use browser::WebDriverFetcher;
pub use fetcher::{DynamicPageFetcher, StaticPageFetcher};
pub use http::HttpPageFetcher;
pub use model::{PrimaryProfile, ProfileRecord, ProfileSource};
