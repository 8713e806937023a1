use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;

use mirra::journal::Journal;
use mirra::scheduler::Scheduler;
use mirra::sync::{SyncConfig, SyncEngine};

/// Periodically mirrors a source folder into a replica, logging every change.
#[derive(Parser, Debug)]
#[command(name = "mirra", version)]
struct Cli {
    /// Folder to mirror from
    source: PathBuf,
    /// Folder to mirror into
    replica: PathBuf,
    /// File the change journal is appended to
    log_file: PathBuf,
    /// Seconds between passes, measured completion to start
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    interval: u64,
    /// Hash files in parallel while scanning
    #[arg(long)]
    parallel: bool,
    /// Run a single pass and exit
    #[arg(long)]
    once: bool,
    /// With --once, print the pass report as JSON to stdout
    #[arg(long, requires = "once")]
    json: bool,
    /// With --once, plan actions without touching the replica
    #[arg(long, requires = "once")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if !cli.source.is_dir() {
        bail!(
            "source folder {} does not exist or is not a directory",
            cli.source.display()
        );
    }

    // A brand-new mirror starts from an empty replica
    std::fs::create_dir_all(&cli.replica)
        .with_context(|| format!("failed to create replica folder {}", cli.replica.display()))?;

    // Absolute roots so journal lines carry absolute replica paths
    let source_root = cli
        .source
        .canonicalize()
        .with_context(|| format!("failed to resolve source folder {}", cli.source.display()))?;
    let replica_root = cli
        .replica
        .canonicalize()
        .with_context(|| format!("failed to resolve replica folder {}", cli.replica.display()))?;

    let journal = Journal::open(&cli.log_file)
        .with_context(|| format!("failed to open log file {}", cli.log_file.display()))?;

    let config = SyncConfig {
        parallel: cli.parallel,
        dry_run: cli.dry_run,
    };
    // The journal must never sync or delete itself
    let engine = SyncEngine::with_config(source_root, replica_root, config)
        .with_exclude(journal.path());

    if cli.once {
        run_once(engine, journal, cli.json).await
    } else {
        let scheduler = Scheduler::new(Duration::from_secs(cli.interval));
        scheduler.run(engine, journal).await
    }
}

/// Single pass: exit non-zero if the pass or any action failed.
async fn run_once(engine: SyncEngine, mut journal: Journal, print_json: bool) -> Result<()> {
    let (outcome, mut journal) = tokio::task::spawn_blocking(move || {
        let outcome = engine.sync(&mut journal);
        (outcome, journal)
    })
    .await
    .context("sync pass task failed")?;

    if let Err(e) = &outcome {
        if let Err(log_err) = journal.error(&e.to_string()) {
            eprintln!("Warning: failed to write journal entry: {}", log_err);
        }
    }
    let report = outcome.context("sync pass failed")?;

    if print_json {
        println!("{}", report.to_json().context("failed to format pass report")?);
    }

    if report.has_failures() {
        bail!("{} action(s) failed", report.stats.files_failed);
    }

    Ok(())
}
