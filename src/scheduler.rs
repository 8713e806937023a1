//! Fixed-interval pass scheduling.
//!
//! One pass at a time, forever: run, wait the configured gap, run again.
//! The gap is measured from pass completion to the next start, so a slow
//! pass delays the next one rather than overlapping it.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::journal::Journal;
use crate::sync::SyncEngine;

/// Drives repeated sync passes.
pub struct Scheduler {
    interval: Duration,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run passes until interrupted.
    ///
    /// A pass-fatal error is journaled and the next tick simply retries; a
    /// vanished source root, say, heals once it reappears. Ctrl-C stops the
    /// loop at the next suspension point, so an in-flight pass always
    /// completes before shutdown.
    pub async fn run(&self, mut engine: SyncEngine, mut journal: Journal) -> Result<()> {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            // Blocking filesystem work stays off the async workers
            let (returned_engine, returned_journal, outcome) =
                tokio::task::spawn_blocking(move || {
                    let outcome = engine.sync(&mut journal);
                    (engine, journal, outcome)
                })
                .await
                .context("sync pass task failed")?;
            engine = returned_engine;
            journal = returned_journal;

            if let Err(e) = outcome {
                if let Err(log_err) = journal.error(&e.to_string()) {
                    eprintln!("Warning: failed to write journal entry: {}", log_err);
                }
            }

            tokio::select! {
                result = &mut ctrl_c => {
                    if let Err(e) = result {
                        eprintln!("Warning: failed to listen for shutdown signal: {}", e);
                    }
                    println!("Shutting down");
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        Ok(())
    }
}
