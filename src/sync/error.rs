// Error types for the sync engine
// Distinguishes pass-fatal scan failures from per-action apply failures

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Error type for a sync pass.
///
/// `WalkError` (and a `ReadError` raised while snapshotting) abort the whole
/// pass; the scheduler logs it and retries on the next tick. `ReadError`,
/// `WriteError` and `DeleteError` raised while applying an action only fail
/// that action.
#[derive(Debug)]
pub enum SyncError {
    /// A tree root could not be traversed
    WalkError { root: PathBuf, source: io::Error },
    /// A file could not be opened or read
    ReadError { path: PathBuf, source: io::Error },
    /// A copy or directory creation failed
    WriteError { path: PathBuf, source: io::Error },
    /// A replica file could not be removed
    DeleteError { path: PathBuf, source: io::Error },
}

impl SyncError {
    pub fn walk(root: impl Into<PathBuf>, source: io::Error) -> Self {
        SyncError::WalkError { root: root.into(), source }
    }

    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SyncError::ReadError { path: path.into(), source }
    }

    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SyncError::WriteError { path: path.into(), source }
    }

    pub fn delete(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SyncError::DeleteError { path: path.into(), source }
    }

    /// Path the error is about (tree root for walk errors).
    pub fn path(&self) -> &Path {
        match self {
            SyncError::WalkError { root, .. } => root,
            SyncError::ReadError { path, .. } => path,
            SyncError::WriteError { path, .. } => path,
            SyncError::DeleteError { path, .. } => path,
        }
    }

    /// True when the error aborts the pass instead of a single action.
    pub fn is_pass_fatal(&self) -> bool {
        matches!(self, SyncError::WalkError { .. })
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Single line: these messages end up embedded in journal lines
        match self {
            SyncError::WalkError { root, source } => {
                write!(f, "failed to walk {}: {}", root.display(), source)
            }
            SyncError::ReadError { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            SyncError::WriteError { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
            SyncError::DeleteError { path, source } => {
                write!(f, "failed to delete {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::WalkError { source, .. }
            | SyncError::ReadError { source, .. }
            | SyncError::WriteError { source, .. }
            | SyncError::DeleteError { source, .. } => Some(source),
        }
    }
}
