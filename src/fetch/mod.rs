// src/fetch/mod.rs
// =============================================================================
// The Page Fetcher: issues one request and hands back the raw body.
//
// Submodules:
// - error: FetchError and how it is classified (transient or not)
// - http: the reqwest-backed implementation used in production
//
// The rest of the crate only talks to the Fetcher trait, so the run
// controller can be exercised against scripted responses in tests.
// =============================================================================

mod error;
mod http;

use async_trait::async_trait;
use url::Url;

pub use error::FetchError;
pub use http::{FetchSettings, HttpFetcher};

/// Raw response of an attachment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub status: u16,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches a listing or detail page and returns its markup.
    ///
    /// Any non-success status is reported as `FetchError::Status`.
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError>;

    /// Fetches an attachment. Certificate verification is always off here.
    async fn fetch_document(&self, url: &Url) -> Result<Document, FetchError>;
}
