// Action application module
// Executes one planned mutation against the replica tree

use super::diff::Action;
use super::error::SyncError;
use crate::journal::LogRecord;
use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of one successfully applied action.
#[derive(Debug, Clone)]
pub struct Applied {
    pub record: LogRecord,
    pub bytes_copied: u64,
}

/// Executes actions against the replica tree.
///
/// Exactly one filesystem mutation and one log record per action. A failure
/// fails only that action; the caller decides whether to continue.
pub struct Applier {
    source_root: PathBuf,
    replica_root: PathBuf,
}

impl Applier {
    pub fn new(source_root: impl Into<PathBuf>, replica_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            replica_root: replica_root.into(),
        }
    }

    /// Absolute replica-side path for a relative one.
    pub fn replica_path(&self, rel: &Path) -> PathBuf {
        self.replica_root.join(rel)
    }

    /// Apply one action.
    pub fn apply(&self, action: &Action) -> Result<Applied, SyncError> {
        match action {
            Action::Create(rel) | Action::Update(rel) => {
                let bytes_copied = self.copy_into_replica(rel)?;
                let record = LogRecord::new(action.kind(), self.replica_path(rel));
                Ok(Applied { record, bytes_copied })
            }
            Action::Delete(rel) => {
                let target = self.replica_path(rel);
                fs::remove_file(&target).map_err(|e| SyncError::delete(&target, e))?;
                let record = LogRecord::new(action.kind(), target);
                Ok(Applied { record, bytes_copied: 0 })
            }
        }
    }

    /// Copy `source_root/rel` to `replica_root/rel`, creating intermediate
    /// directories and carrying the source mtime onto the copy.
    fn copy_into_replica(&self, rel: &Path) -> Result<u64, SyncError> {
        let source = self.source_root.join(rel);
        let target = self.replica_path(rel);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| SyncError::write(parent, e))?;
        }

        let bytes_copied = fs::copy(&source, &target).map_err(|e| SyncError::write(&target, e))?;

        // fs::copy carries content only; the mtime has to follow separately
        let metadata = fs::metadata(&source).map_err(|e| SyncError::read(&source, e))?;
        if let Ok(modified) = metadata.modified() {
            filetime::set_file_mtime(&target, FileTime::from_system_time(modified))
                .map_err(|e| SyncError::write(&target, e))?;
        }

        Ok(bytes_copied)
    }
}

// Tests in tests/sync/apply_tests.rs
