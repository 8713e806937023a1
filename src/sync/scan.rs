// Tree scanning module
// Walks a directory tree and fingerprints every regular file

use super::error::SyncError;
use super::hash::{Fingerprint, Hasher};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use crossbeam_channel::{bounded, Sender};
use jwalk::WalkDir;
use rayon::prelude::*;

/// A content-addressed view of one tree at one instant.
///
/// Keys are paths relative to the scanned root; values are content
/// fingerprints. Built fresh every pass and discarded afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    files: HashMap<PathBuf, Fingerprint>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self { files: HashMap::new() }
    }

    /// Insert an entry. A repeated relative path overwrites the previous
    /// entry, so the last scanned occurrence wins.
    pub fn insert(&mut self, path: impl Into<PathBuf>, fingerprint: Fingerprint) {
        self.files.insert(path.into(), fingerprint);
    }

    pub fn get(&self, path: &Path) -> Option<&Fingerprint> {
        self.files.get(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &Fingerprint)> {
        self.files.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.keys()
    }
}

impl FromIterator<(PathBuf, Fingerprint)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (PathBuf, Fingerprint)>>(iter: I) -> Self {
        Self { files: iter.into_iter().collect() }
    }
}

/// Engine for snapshotting directory trees.
///
/// Any failure while walking or reading aborts the scan: a snapshot with a
/// silent hole would later read as "file deleted" to the diff, and a mirror
/// must never delete replica files it merely failed to look at.
pub struct ScanEngine {
    hasher: Hasher,
    parallel: bool,
    exclude: Option<PathBuf>,
}

impl ScanEngine {
    /// Create a new ScanEngine with default settings (sequential)
    pub fn new() -> Self {
        Self {
            hasher: Hasher::new(),
            parallel: false,
            exclude: None,
        }
    }

    /// Create a new ScanEngine with parallel hashing enabled
    pub fn with_parallel(parallel: bool) -> Self {
        Self {
            hasher: Hasher::new(),
            parallel,
            exclude: None,
        }
    }

    /// Exclude one file from scans (the journal, when it lives under a
    /// scanned root)
    pub fn with_exclude(mut self, path: impl Into<PathBuf>) -> Self {
        self.exclude = Some(path.into());
        self
    }

    /// Snapshot a directory tree.
    ///
    /// Every regular file below `root` is fingerprinted and keyed by its
    /// root-relative path. Symlinks and other non-regular entries are
    /// skipped, never followed. Fails with `WalkError` if the root does not
    /// exist or any directory cannot be traversed, and with `ReadError` if
    /// any file cannot be hashed.
    pub fn scan(&self, root: &Path) -> Result<Snapshot, SyncError> {
        // Canonicalize for consistent path handling; doubles as the
        // existence check
        let canonical_root = root
            .canonicalize()
            .map_err(|e| SyncError::walk(root, e))?;

        // Canonicalize the exclude path once per scan
        let canonical_exclude = self.exclude.as_ref().and_then(|p| p.canonicalize().ok());

        if self.parallel {
            self.scan_parallel(&canonical_root, canonical_exclude.as_deref())
        } else {
            self.scan_sequential(&canonical_root, canonical_exclude.as_deref())
        }
    }

    /// Sequential scan implementation
    fn scan_sequential(
        &self,
        canonical_root: &Path,
        canonical_exclude: Option<&Path>,
    ) -> Result<Snapshot, SyncError> {
        let mut files = Vec::new();
        Self::collect_files_recursive(canonical_root, &mut files, canonical_exclude)?;

        let mut snapshot = Snapshot::new();
        for path in files {
            let fingerprint = self.hasher.hash_file(&path)?;
            let rel_path = match path.strip_prefix(canonical_root) {
                Ok(rel) => rel.to_path_buf(),
                Err(_) => path.clone(),
            };
            snapshot.insert(rel_path, fingerprint);
        }
        Ok(snapshot)
    }

    /// Parallel scan implementation using a producer-consumer pattern with
    /// jwalk and crossbeam-channel
    fn scan_parallel(
        &self,
        canonical_root: &Path,
        canonical_exclude: Option<&Path>,
    ) -> Result<Snapshot, SyncError> {
        // Bounded channel provides backpressure against very large trees
        let (sender, receiver) = bounded::<PathBuf>(10000);

        let walker_root = canonical_root.to_path_buf();
        let walker_exclude = canonical_exclude.map(Path::to_path_buf);

        // Walker thread discovers files while the rayon side hashes them
        let walker_handle = thread::spawn(move || {
            Self::walk_streaming(&walker_root, sender, walker_exclude.as_deref())
        });

        let hasher = self.hasher.clone();
        let root_for_rel = canonical_root.to_path_buf();
        let consumed: Result<Vec<(PathBuf, Fingerprint)>, SyncError> = receiver
            .into_iter()
            .par_bridge()
            .map(|path| {
                let fingerprint = hasher.hash_file(&path)?;
                let rel_path = match path.strip_prefix(&root_for_rel) {
                    Ok(rel) => rel.to_path_buf(),
                    Err(_) => path.clone(),
                };
                Ok((rel_path, fingerprint))
            })
            .collect();

        // A walker failure outranks whatever the consumer managed to hash:
        // the snapshot would be incomplete either way
        match walker_handle.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => {
                return Err(SyncError::walk(
                    canonical_root,
                    io::Error::new(io::ErrorKind::Other, "walker thread panicked"),
                ));
            }
        }

        Ok(consumed?.into_iter().collect())
    }

    /// Walk the tree with jwalk and send file paths to the channel as they
    /// are discovered. Producer half of the parallel scan.
    fn walk_streaming(
        root: &Path,
        sender: Sender<PathBuf>,
        canonical_exclude: Option<&Path>,
    ) -> Result<(), SyncError> {
        // RayonNewPool keeps directory walking off the pool used for
        // hashing; 0 = default thread count
        for entry_result in WalkDir::new(root)
            .parallelism(jwalk::Parallelism::RayonNewPool(0))
            .skip_hidden(false) // A mirror must mirror hidden files too
            .follow_links(false) // Never follow symlinks
        {
            match entry_result {
                Ok(entry) => {
                    // Only regular files become snapshot entries
                    if !entry.file_type().is_file() {
                        continue;
                    }
                    let path = entry.path();

                    if let Some(exclude) = canonical_exclude {
                        if let Ok(canonical_path) = path.canonicalize() {
                            if canonical_path == exclude {
                                continue;
                            }
                        }
                    }

                    // Blocks when the channel is full (backpressure); fails
                    // only when the receiver is gone, so stop walking
                    if sender.send(path).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let message = e.to_string();
                    return Err(SyncError::walk(
                        root,
                        io::Error::new(io::ErrorKind::Other, message),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Recursively collect every regular file under `dir`. Symlinks and
    /// special files are skipped.
    fn collect_files_recursive(
        dir: &Path,
        files: &mut Vec<PathBuf>,
        canonical_exclude: Option<&Path>,
    ) -> Result<(), SyncError> {
        let entries = fs::read_dir(dir).map_err(|e| SyncError::walk(dir, e))?;

        for entry_result in entries {
            let entry = entry_result.map_err(|e| SyncError::walk(dir, e))?;
            let path = entry.path();

            // file_type does not follow symlinks
            let file_type = entry.file_type().map_err(|e| SyncError::walk(&path, e))?;

            if let Some(exclude) = canonical_exclude {
                if let Ok(canonical_path) = path.canonicalize() {
                    if canonical_path == exclude {
                        continue;
                    }
                }
            }

            if file_type.is_file() {
                files.push(path);
            } else if file_type.is_dir() {
                Self::collect_files_recursive(&path, files, canonical_exclude)?;
            }
            // Symlinks and other special entries fall through
        }

        Ok(())
    }
}

impl Default for ScanEngine {
    fn default() -> Self {
        Self::new()
    }
}

// Tests in tests/sync/scan_tests.rs
