// src/fetch/http.rs
// =============================================================================
// The production Fetcher, backed by reqwest.
//
// Key functionality:
// - One client for listing and detail pages. Certificate verification on
//   this client follows the --insecure flag.
// - A second client for attachments, which never verifies certificates.
// - Both clients have an explicit timeout. A timeout is just another
//   transport error to the caller.
//
// Rust concepts:
// - async/await: every request is awaited before the next one is issued
// - Result<T, E>: reqwest errors are mapped into our own FetchError
// =============================================================================

use super::{Document, FetchError, Fetcher};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

// Settings shared by both clients
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub timeout: Duration,
    /// Verify TLS certificates on listing / detail pages
    pub verify_certificates: bool,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            verify_certificates: true,
            user_agent: concat!("kosova-crawl/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

pub struct HttpFetcher {
    pages: Client,
    documents: Client,
}

impl HttpFetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self, reqwest::Error> {
        let pages = Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.as_str())
            .danger_accept_invalid_certs(!settings.verify_certificates)
            .build()?;

        let documents = Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.as_str())
            .danger_accept_invalid_certs(true)
            .build()?;

        Ok(Self { pages, documents })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        debug!(url, "GET page");
        let response = self
            .pages
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))
    }

    async fn fetch_document(&self, url: &Url) -> Result<Document, FetchError> {
        debug!(url = %url, "GET attachment");
        let response = self
            .documents
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url.as_str(), e))?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(url.as_str(), e))?;

        Ok(Document {
            status,
            bytes: bytes.to_vec(),
        })
    }
}
