// src/sink/backup.rs
// =============================================================================
// The Backup Sink: every visited detail page is kept verbatim.
//
// Layout: <root>/<run folder>/<capture stamp>_<sequence id>_listing.txt
//
// A write failure here is NOT absorbed. It surfaces as CrawlError::Backup
// and ends the run, because a record without its raw page is not allowed.
// =============================================================================

use crate::error::{CrawlError, CrawlResult};
use crate::model::SequenceId;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct BackupSink {
    root: PathBuf,
}

impl BackupSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, run_folder: &str, capture_stamp: &str, sequence_id: SequenceId) -> PathBuf {
        self.root
            .join(run_folder)
            .join(format!("{capture_stamp}_{sequence_id}_listing.txt"))
    }

    /// Writes the markup unmodified and returns where it went.
    pub async fn persist(
        &self,
        markup: &str,
        run_folder: &str,
        capture_stamp: &str,
        sequence_id: SequenceId,
    ) -> CrawlResult<PathBuf> {
        let path = self.path_for(run_folder, capture_stamp, sequence_id);
        let backup_error = |source| CrawlError::Backup {
            path: path.clone(),
            source,
        };

        if let Some(folder) = path.parent() {
            tokio::fs::create_dir_all(folder).await.map_err(backup_error)?;
        }
        tokio::fs::write(&path, markup.as_bytes())
            .await
            .map_err(backup_error)?;

        Ok(path)
    }
}
