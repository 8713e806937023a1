// Diff engine module
// Turns two snapshots into the ordered action list that converges the
// replica toward the source

use super::hash::Fingerprint;
use super::scan::Snapshot;
use std::fmt;
use std::path::{Path, PathBuf};

/// Past-tense label of an applied action, the vocabulary of the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Created,
    Updated,
    Deleted,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Created => "Created",
            ActionKind::Updated => "Updated",
            ActionKind::Deleted => "Deleted",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One planned filesystem mutation, keyed by root-relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Copy a file the replica does not have yet
    Create(PathBuf),
    /// Overwrite a replica file whose content differs
    Update(PathBuf),
    /// Remove a replica file the source no longer has
    Delete(PathBuf),
}

impl Action {
    /// Get the relative path this action affects
    pub fn path(&self) -> &Path {
        match self {
            Action::Create(path) => path,
            Action::Update(path) => path,
            Action::Delete(path) => path,
        }
    }

    /// Journal label for the completed action
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Create(_) => ActionKind::Created,
            Action::Update(_) => ActionKind::Updated,
            Action::Delete(_) => ActionKind::Deleted,
        }
    }

    /// True when the action reads from the source tree
    pub fn copies(&self) -> bool {
        matches!(self, Action::Create(_) | Action::Update(_))
    }
}

/// Engine for diffing two snapshots
pub struct DiffEngine;

impl DiffEngine {
    /// Create a new DiffEngine
    pub fn new() -> Self {
        DiffEngine
    }

    /// Compute the actions that make `replica` match `source`.
    ///
    /// Pure function of the two snapshots: no filesystem access, cannot
    /// fail. Every path gets at most one action. Source-derived actions
    /// (creates and updates) come before every delete, so a pass never
    /// removes anything before the copies that may depend on the same
    /// directory structure have been attempted. Within each group, actions
    /// are sorted by path for deterministic output.
    pub fn diff(&self, source: &Snapshot, replica: &Snapshot) -> Vec<Action> {
        let mut actions = Vec::new();

        // Classify source entries against the replica
        for (path, fingerprint) in source.iter() {
            match replica.get(path) {
                None => actions.push(Action::Create(path.clone())),
                Some(existing) if !Self::same_content(existing, fingerprint) => {
                    actions.push(Action::Update(path.clone()))
                }
                Some(_) => {} // identical content, leave the replica alone
            }
        }
        actions.sort_by(|a, b| a.path().cmp(b.path()));

        // Replica entries the source no longer has
        let mut deletes: Vec<Action> = replica
            .paths()
            .filter(|path| !source.contains(path))
            .map(|path| Action::Delete(path.clone()))
            .collect();
        deletes.sort_by(|a, b| a.path().cmp(b.path()));

        actions.extend(deletes);
        actions
    }

    // Equal fingerprints mean equal content; collision risk accepted
    fn same_content(a: &Fingerprint, b: &Fingerprint) -> bool {
        a == b
    }
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new()
    }
}
