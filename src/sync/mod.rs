//! One-way directory synchronization.
//!
//! Everything one pass needs: fingerprinting, tree snapshots, the snapshot
//! diff, and action application with per-action results.

pub mod apply;
pub mod diff;
pub mod engine;
pub mod error;
pub mod hash;
pub mod scan;

pub use apply::{Applied, Applier};
pub use diff::{Action, ActionKind, DiffEngine};
pub use engine::{ActionResult, PassReport, SyncConfig, SyncEngine, SyncStats};
pub use error::SyncError;
pub use hash::{Fingerprint, Hasher, DEFAULT_CHUNK_SIZE};
pub use scan::{ScanEngine, Snapshot};
