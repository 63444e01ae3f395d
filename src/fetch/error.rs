// src/fetch/error.rs
// =============================================================================
// Transport errors.
//
// The controller only needs one question answered about a failed request:
// "is this worth backing off and retrying?" That is is_transient().
// =============================================================================

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("connection to {url} failed: {message}")]
    Connect { url: String, message: String },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("'{url}' is not a valid URL")]
    InvalidUrl { url: String },

    #[error("request to {url} failed: {message}")]
    Other { url: String, message: String },
}

impl FetchError {
    /// True for failures a later attempt may not hit again: timeouts,
    /// dropped connections, 5xx and 429 answers.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Timeout { .. } | FetchError::Connect { .. } | FetchError::Other { .. } => true,
            FetchError::Status { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS.as_u16() || (500..600).contains(status)
            }
            FetchError::InvalidUrl { .. } => false,
        }
    }

    // Categorizes the different reasons reqwest can fail
    pub(crate) fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            FetchError::Timeout { url }
        } else if error.is_connect() {
            FetchError::Connect {
                url,
                message: error.to_string(),
            }
        } else if error.is_builder() {
            FetchError::InvalidUrl { url }
        } else if let Some(status) = error.status() {
            FetchError::Status {
                url,
                status: status.as_u16(),
            }
        } else {
            FetchError::Other {
                url,
                message: error.to_string(),
            }
        }
    }
}
