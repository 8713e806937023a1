//! The audit journal: one line per replica mutation.
//!
//! Lines look like `2026-08-25 14:03:07.512 - Created: /replica/a.txt` and
//! are appended to the log file and mirrored to the console. Success lines
//! go to stdout, `Error:` lines to stderr; the file gets both.

use crate::sync::diff::ActionKind;
use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// One completed replica mutation.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub kind: ActionKind,
    /// Replica-side path the mutation touched
    pub path: PathBuf,
}

impl LogRecord {
    /// Stamp a record with the current local time.
    pub fn new(kind: ActionKind, path: impl Into<PathBuf>) -> Self {
        Self {
            timestamp: Local::now(),
            kind,
            path: path.into(),
        }
    }

    /// The journal line for this record, without the trailing newline.
    pub fn format_line(&self) -> String {
        format!(
            "{} - {}: {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.kind,
            self.path.display()
        )
    }
}

/// Append-only log sink with console mirroring.
pub struct Journal {
    path: PathBuf,
    file: File,
}

impl Journal {
    /// Open (or create) the journal file for appending.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { path: path.to_path_buf(), file })
    }

    /// Where this journal writes. Scans exclude this path so the journal
    /// never syncs or deletes itself.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one action line and mirror it to stdout.
    pub fn record(&mut self, record: &LogRecord) -> io::Result<()> {
        let line = record.format_line();
        println!("{}", line);
        writeln!(self.file, "{}", line)
    }

    /// Append one failure line and mirror it to stderr.
    pub fn error(&mut self, message: &str) -> io::Result<()> {
        let line = format!(
            "{} - Error: {}",
            Local::now().format(TIMESTAMP_FORMAT),
            message
        );
        eprintln!("{}", line);
        writeln!(self.file, "{}", line)
    }
}

// Tests in tests/sync/journal_tests.rs
