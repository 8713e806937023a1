//! One-way sync passes.
//!
//! A pass snapshots both trees, diffs them, and applies the resulting
//! actions in order, journaling every mutation. Scan failures abort the
//! pass; apply failures only fail their own action.

use std::path::PathBuf;
use std::time::Instant;

use crate::journal::Journal;
use crate::sync::apply::Applier;
use crate::sync::diff::{Action, ActionKind, DiffEngine};
use crate::sync::error::SyncError;
use crate::sync::scan::ScanEngine;

/// Pass configuration.
#[derive(Debug, Clone, Default)]
pub struct SyncConfig {
    /// Hash files in parallel while scanning.
    pub parallel: bool,
    /// Plan actions without touching the replica or the journal.
    pub dry_run: bool,
}

/// Counters for one pass.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct SyncStats {
    pub files_created: usize,
    pub files_updated: usize,
    pub files_deleted: usize,
    pub files_failed: usize,
    pub bytes_copied: u64,
    pub duration_ms: u64,
}

/// Outcome of one attempted action.
#[derive(Debug, Clone)]
pub struct ActionResult {
    pub action: Action,
    /// Replica-side path the action targeted
    pub replica_path: PathBuf,
    pub error: Option<String>,
}

impl ActionResult {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Everything one pass did (or, for a dry run, would do).
#[derive(Debug, Clone)]
pub struct PassReport {
    pub actions: Vec<ActionResult>,
    pub stats: SyncStats,
    pub dry_run: bool,
}

impl PassReport {
    pub fn has_failures(&self) -> bool {
        self.actions.iter().any(|result| !result.succeeded())
    }

    /// Format the report as a JSON document.
    pub fn to_json(&self) -> serde_json::Result<String> {
        #[derive(serde::Serialize)]
        struct Metadata {
            generated: String,
        }

        #[derive(serde::Serialize)]
        struct ActionJson {
            kind: String,
            path: String,
            replica_path: String,
            error: Option<String>,
        }

        #[derive(serde::Serialize)]
        struct JsonOutput {
            metadata: Metadata,
            dry_run: bool,
            summary: SyncStats,
            actions: Vec<ActionJson>,
        }

        let output = JsonOutput {
            metadata: Metadata {
                generated: chrono::Utc::now().to_rfc3339(),
            },
            dry_run: self.dry_run,
            summary: self.stats.clone(),
            actions: self
                .actions
                .iter()
                .map(|result| ActionJson {
                    kind: result.action.kind().as_str().to_string(),
                    path: result.action.path().display().to_string(),
                    replica_path: result.replica_path.display().to_string(),
                    error: result.error.clone(),
                })
                .collect(),
        };

        serde_json::to_string_pretty(&output)
    }
}

/// Engine for running sync passes against a source/replica pair.
pub struct SyncEngine {
    source_root: PathBuf,
    replica_root: PathBuf,
    config: SyncConfig,
    exclude: Option<PathBuf>,
}

impl SyncEngine {
    /// Create an engine with the default configuration.
    ///
    /// Pass absolute roots if journal lines should carry absolute replica
    /// paths; the CLI canonicalizes both at startup.
    pub fn new(source_root: impl Into<PathBuf>, replica_root: impl Into<PathBuf>) -> Self {
        Self::with_config(source_root, replica_root, SyncConfig::default())
    }

    /// Create an engine with an explicit configuration.
    pub fn with_config(
        source_root: impl Into<PathBuf>,
        replica_root: impl Into<PathBuf>,
        config: SyncConfig,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            replica_root: replica_root.into(),
            config,
            exclude: None,
        }
    }

    /// Keep one file out of both snapshots (the journal, when it lives
    /// under either root).
    pub fn with_exclude(mut self, path: impl Into<PathBuf>) -> Self {
        self.exclude = Some(path.into());
        self
    }

    /// Run one pass: scan both trees, diff, apply in order.
    ///
    /// Convergent and idempotent: running against an already matching pair
    /// applies nothing and journals nothing.
    pub fn sync(&self, journal: &mut Journal) -> Result<PassReport, SyncError> {
        self.run_pass(Some(journal), self.config.dry_run)
    }

    /// Plan a pass without mutating the replica or writing the journal.
    pub fn dry_run(&self) -> Result<PassReport, SyncError> {
        self.run_pass(None, true)
    }

    fn run_pass(
        &self,
        mut journal: Option<&mut Journal>,
        dry_run: bool,
    ) -> Result<PassReport, SyncError> {
        let start = Instant::now();

        let mut scanner = ScanEngine::with_parallel(self.config.parallel);
        if let Some(exclude) = &self.exclude {
            scanner = scanner.with_exclude(exclude);
        }

        let source_snapshot = scanner.scan(&self.source_root)?;
        let replica_snapshot = scanner.scan(&self.replica_root)?;
        let actions = DiffEngine::new().diff(&source_snapshot, &replica_snapshot);

        let applier = Applier::new(&self.source_root, &self.replica_root);
        let mut results = Vec::with_capacity(actions.len());
        let mut stats = SyncStats::default();

        for action in actions {
            let replica_path = applier.replica_path(action.path());

            if dry_run {
                results.push(ActionResult { action, replica_path, error: None });
                continue;
            }

            match applier.apply(&action) {
                Ok(applied) => {
                    match action.kind() {
                        ActionKind::Created => stats.files_created += 1,
                        ActionKind::Updated => stats.files_updated += 1,
                        ActionKind::Deleted => stats.files_deleted += 1,
                    }
                    stats.bytes_copied += applied.bytes_copied;

                    if let Some(journal) = journal.as_deref_mut() {
                        if let Err(e) = journal.record(&applied.record) {
                            eprintln!(
                                "Warning: failed to write journal entry for {}: {}",
                                applied.record.path.display(),
                                e
                            );
                        }
                    }
                    results.push(ActionResult { action, replica_path, error: None });
                }
                Err(e) => {
                    // The action failed; the pass carries on with the rest
                    stats.files_failed += 1;
                    let message = e.to_string();

                    if let Some(journal) = journal.as_deref_mut() {
                        if let Err(log_err) = journal.error(&message) {
                            eprintln!("Warning: failed to write journal entry: {}", log_err);
                        }
                    }
                    results.push(ActionResult { action, replica_path, error: Some(message) });
                }
            }
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;

        Ok(PassReport { actions: results, stats, dry_run })
    }
}
