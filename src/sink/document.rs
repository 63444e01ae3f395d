// src/sink/document.rs
// Where downloaded attachments land: <dir>/<run_stamp>_<sequence_id>.<ext>
// Each file is written once and never revisited.

use crate::model::SequenceId;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct DocumentStore {
    dir: PathBuf,
    run_stamp: String,
}

impl DocumentStore {
    pub fn new(dir: impl Into<PathBuf>, run_stamp: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            run_stamp: run_stamp.into(),
        }
    }

    pub fn path_for(&self, sequence_id: SequenceId, extension: &str) -> PathBuf {
        self.dir
            .join(format!("{}_{}.{}", self.run_stamp, sequence_id, extension))
    }

    pub async fn save(
        &self,
        sequence_id: SequenceId,
        extension: &str,
        bytes: &[u8],
    ) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(sequence_id, extension);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_encodes_run_and_sequence() {
        let store = DocumentStore::new("/data/files", "20240101_120000");
        assert_eq!(
            store.path_for(SequenceId(42), "pdf"),
            PathBuf::from("/data/files/20240101_120000_42.pdf")
        );
    }

    #[tokio::test]
    async fn test_save_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(tmp.path().join("nested"), "run");
        let path = store.save(SequenceId(3), "jpg", b"\xff\xd8").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"\xff\xd8");
        assert!(path.starts_with(tmp.path().join("nested")));
    }
}
