// src/error.rs
// =============================================================================
// Error types for the crawl pipeline.
//
// There are two layers:
// - ListingError: something is wrong with ONE listing. The controller skips
//   that listing, bumps the skip counter and moves on.
// - CrawlError: something is wrong with the RUN itself (the backup trail
//   cannot be written, a selector does not compile, ...). These stop the run.
//
// Transport failures live in fetch::FetchError, because the controller treats
// them differently again (back off and retry the page list).
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListingError {
    #[error("required element '{field}' not found")]
    MissingElement { field: &'static str },

    #[error("element '{field}' has no '{attr}' attribute")]
    MissingAttribute {
        field: &'static str,
        attr: &'static str,
    },

    #[error("field '{field}' has unusable value '{value}'")]
    InvalidField { field: &'static str, value: String },

    #[error("detail link '{link}' could not be resolved")]
    InvalidLink { link: String },

    #[error("detail page unavailable: {reason}")]
    DetailUnavailable { reason: String },
}

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("invalid CSS selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    #[error("could not write backup file {path}: {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not access checkpoint {path}: {source}")]
    Checkpoint {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("checkpoint is not valid JSON: {0}")]
    CheckpointFormat(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("could not build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

pub type CrawlResult<T> = Result<T, CrawlError>;
