// src/test_support.rs
// A Fetcher that answers from a script instead of the network.

use crate::fetch::{Document, FetchError, Fetcher};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use url::Url;

#[derive(Default)]
pub struct ScriptedFetcher {
    pages: HashMap<String, String>,
    documents: HashMap<String, Document>,
    // url -> remaining connection failures before the page is served
    failures: Mutex<HashMap<String, u32>>,
    requests: Mutex<Vec<String>>,
    // url -> directory that is replaced by a plain file when url is fetched
    blockers: HashMap<String, PathBuf>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    pub fn document(mut self, url: &str, status: u16, bytes: &[u8]) -> Self {
        self.documents.insert(
            url.to_string(),
            Document {
                status,
                bytes: bytes.to_vec(),
            },
        );
        self
    }

    pub fn fail_times(self, url: &str, times: u32) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(url.to_string(), times);
        self
    }

    // Once `url` is requested, `dir` can no longer be written into
    pub fn block_dir_on(mut self, url: &str, dir: impl Into<PathBuf>) -> Self {
        self.blockers.insert(url.to_string(), dir.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|u| u.as_str() == url).count()
    }

    fn take_failure(&self, url: &str) -> Option<FetchError> {
        let mut failures = self.failures.lock().unwrap();
        match failures.get_mut(url) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                Some(FetchError::Connect {
                    url: url.to_string(),
                    message: "connection reset".to_string(),
                })
            }
            _ => None,
        }
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        if let Some(dir) = self.blockers.get(url) {
            if dir.is_dir() {
                std::fs::remove_dir_all(dir).unwrap();
            }
            std::fs::write(dir, b"blocked").unwrap();
        }
        if let Some(err) = self.take_failure(url) {
            return Err(err);
        }
        self.pages.get(url).cloned().ok_or(FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }

    async fn fetch_document(&self, url: &Url) -> Result<Document, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        if let Some(err) = self.take_failure(url.as_str()) {
            return Err(err);
        }
        self.documents
            .get(url.as_str())
            .cloned()
            .ok_or(FetchError::Connect {
                url: url.to_string(),
                message: "connection refused".to_string(),
            })
    }
}
