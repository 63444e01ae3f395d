// src/model.rs
// =============================================================================
// The data that flows through the crawl pipeline.
//
// - ListingSummary: what the listing page tells us about one posting
// - ListingDetail: what the posting's own detail page tells us
// - ListingRecord: both halves joined, plus the moment we captured it
//
// All three are created once and never mutated afterwards.
// =============================================================================

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

// Per-run monotonically increasing listing identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequenceId(pub u64);

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out sequence ids. Never reset within a run, not even per page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceCounter {
    next: u64,
}

impl SequenceCounter {
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    pub fn next_id(&mut self) -> SequenceId {
        let id = SequenceId(self.next);
        self.next += 1;
        id
    }

    // The id the next call to next_id() will return
    pub fn peek(&self) -> u64 {
        self.next
    }
}

impl Default for SequenceCounter {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

/// Minimal record taken from one listing container on a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingSummary {
    /// Absolute URL of the detail page
    pub link: String,
    pub title: String,
    pub city: String,
    pub sequence_id: SequenceId,
}

/// The extended field set read from a listing's detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingDetail {
    pub company_name: String,
    pub expiration_date: NaiveDate,
    pub job_category: String,
    pub job_description: String,
    pub contract_type: String,
    pub view_count: u64,
    pub has_document: bool,
}

// One successfully processed listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub captured_at: DateTime<Local>,
    pub summary: ListingSummary,
    pub detail: ListingDetail,
}

impl ListingRecord {
    pub fn new(captured_at: DateTime<Local>, summary: ListingSummary, detail: ListingDetail) -> Self {
        Self {
            captured_at,
            summary,
            detail,
        }
    }

    pub fn sequence_id(&self) -> SequenceId {
        self.summary.sequence_id
    }
}

// Timestamp format used in file names (run folder, backups, attachments)
pub const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub fn file_stamp(at: &DateTime<Local>) -> String {
    at.format(STAMP_FORMAT).to_string()
}
