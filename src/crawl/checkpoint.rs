// src/crawl/checkpoint.rs
// =============================================================================
// Cross-process resumability.
//
// After every completed page (and when a run stops) the controller writes
// the outstanding page list, the counters, the in-page cursor and every
// record captured so far to a JSON file. A later `resume` starts from
// exactly that state: completed pages are not fetched again, their records
// come back from the file, and sequence ids continue where the previous
// process stopped.
//
// The file is replaced atomically (write to a sibling temp file, rename),
// so a crash in the middle of a save leaves the previous checkpoint intact.
// =============================================================================

use super::state::PageCursor;
use crate::error::{CrawlError, CrawlResult};
use crate::model::ListingRecord;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Run folder the backups of this run are written to
    pub run_stamp: String,
    pub outstanding: Vec<u32>,
    pub next_sequence_id: u64,
    pub skipped: u64,
    /// The run reached its last page; nothing is left to resume
    pub finished: bool,
    /// Containers of the front page already handled
    #[serde(default)]
    pub cursor: Option<PageCursor>,
    /// Records captured before this checkpoint was written
    #[serde(default)]
    pub records: Vec<ListingRecord>,
}

#[derive(Debug, Clone)]
pub struct CheckpointFile {
    path: PathBuf,
}

impl CheckpointFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> CrawlResult<Checkpoint> {
        let raw = std::fs::read_to_string(&self.path).map_err(|source| CrawlError::Checkpoint {
            path: self.path.clone(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, checkpoint: &Checkpoint) -> CrawlResult<()> {
        let io_error = |source| CrawlError::Checkpoint {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let json = serde_json::to_string_pretty(checkpoint)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json).map_err(io_error)?;
        std::fs::rename(&tmp, &self.path).map_err(io_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ListingDetail, ListingSummary, SequenceId};
    use chrono::{Local, NaiveDate, TimeZone};

    fn sample() -> Checkpoint {
        let record = ListingRecord::new(
            Local.with_ymd_and_hms(2024, 5, 10, 8, 0, 5).unwrap(),
            ListingSummary {
                link: "https://www.kosovajob.com/job/20".into(),
                title: "Engineer".into(),
                city: "Pristina".into(),
                sequence_id: SequenceId(20),
            },
            ListingDetail {
                company_name: "Acme".into(),
                expiration_date: NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(),
                job_category: "IT".into(),
                job_description: "Hiring".into(),
                contract_type: "Full time".into(),
                view_count: 10,
                has_document: true,
            },
        );
        Checkpoint {
            run_stamp: "20240510_080000".into(),
            outstanding: vec![4, 5],
            next_sequence_id: 21,
            skipped: 2,
            finished: false,
            cursor: Some(PageCursor { page: 4, handled: 3 }),
            records: vec![record],
        }
    }

    #[test]
    fn test_save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let file = CheckpointFile::new(tmp.path().join("state").join("run.json"));
        file.save(&sample()).unwrap();

        assert_eq!(file.load().unwrap(), sample());
        assert!(!file.path().with_extension("tmp").exists());
    }

    #[test]
    fn test_older_file_without_records_still_loads() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("run.json");
        std::fs::write(
            &path,
            r#"{"run_stamp":"r","outstanding":[2],"next_sequence_id":5,"skipped":0,"finished":false}"#,
        )
        .unwrap();

        let loaded = CheckpointFile::new(path).load().unwrap();
        assert!(loaded.records.is_empty());
        assert_eq!(loaded.cursor, None);
    }

    #[test]
    fn test_missing_file_is_checkpoint_error() {
        let tmp = tempfile::tempdir().unwrap();
        let file = CheckpointFile::new(tmp.path().join("missing.json"));
        assert!(matches!(file.load(), Err(CrawlError::Checkpoint { .. })));
    }

    #[test]
    fn test_garbage_is_format_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("run.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            CheckpointFile::new(path).load(),
            Err(CrawlError::CheckpointFormat(_))
        ));
    }
}
