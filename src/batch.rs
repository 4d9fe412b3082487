//! Batch coordination: discover archives, run them through a bounded pool, and
//! tally the outcomes as they complete.
//!
//! Each archive runs as its own Tokio task. A semaphore caps how many are in
//! flight at once, and the coordinator drains the [`JoinSet`] in completion
//! order. The tally is only touched by the coordinator, never by a worker.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Result, bail};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use walkdir::WalkDir;

use crate::processor::{Outcome, process_archive};

/// Extension of the archives picked up by discovery (compared case-insensitively).
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Hard upper bound on automatically sized pools.
pub const MAX_AUTO_WORKERS: usize = 10;

/// Batch-level settings.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Number of archives processed concurrently. `None` sizes the pool
    /// automatically, see [`worker_count`].
    pub workers: Option<usize>,
}

/// Counters for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchTally {
    pub total: usize,
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl BatchTally {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Success(_) => self.processed += 1,
            Outcome::Skip(_) => self.skipped += 1,
            Outcome::Warning(_) => {}
            Outcome::Error(_) => self.errors += 1,
        }
    }
}

impl fmt::Display for BatchTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Finished: {} archive(s) found", self.total)?;
        writeln!(f, "✓ Succeeded: {}", self.processed)?;
        writeln!(f, "↺ Skipped: {}", self.skipped)?;
        write!(f, "✗ Failed: {}", self.errors)
    }
}

/// Whether `path` has the archive extension.
pub fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(ARCHIVE_EXTENSION))
}

/// Recursively collect every archive below `root`, sorted by path.
///
/// Unreadable directory entries are logged and skipped.
pub fn discover_archives(root: &Path) -> Vec<PathBuf> {
    let mut archives: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry during discovery");
                None
            }
        })
        .filter(|entry| !entry.file_type().is_dir())
        .map(|entry| entry.into_path())
        .filter(|path| is_archive(path) && path.is_file())
        .collect();

    archives.sort();
    archives
}

/// Effective pool size.
///
/// An explicit override wins (at least 1). Otherwise the pool is
/// `min(available, MAX_AUTO_WORKERS, archives)`, never less than 1.
pub fn worker_count(requested: Option<usize>, archives: usize, available: usize) -> usize {
    match requested {
        Some(n) => n.max(1),
        None => available.min(MAX_AUTO_WORKERS).min(archives).max(1),
    }
}

fn available_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Convert every archive below `root`.
///
/// `on_outcome` is called once per archive, in completion order, as soon as
/// its outcome is known. Returns the final tally; a tally with `total == 0`
/// means nothing was found. Only a bad `root` is an error.
pub async fn run_batch<F>(root: &Path, options: &BatchOptions, on_outcome: F) -> Result<BatchTally>
where
    F: FnMut(&Path, &Outcome),
{
    if !root.is_dir() {
        bail!("Folder {} does not exist or is not a directory", root.display());
    }

    let archives = discover_archives(root);
    if archives.is_empty() {
        return Ok(BatchTally::default());
    }

    let workers = worker_count(options.workers, archives.len(), available_parallelism());
    tracing::info!(
        "Processing {} archive(s) under {} with {} worker(s)",
        archives.len(),
        root.display(),
        workers
    );

    Ok(run_pool(
        archives,
        workers,
        |archive| async move { process_archive(&archive).await },
        on_outcome,
    )
    .await)
}

/// Run `process` over `archives` with at most `workers` in flight.
///
/// Outcomes are recorded and handed to `on_outcome` in completion order. A
/// task that panics or is cancelled counts as an error for its own archive.
async fn run_pool<P, Fut, F>(
    archives: Vec<PathBuf>,
    workers: usize,
    mut process: P,
    mut on_outcome: F,
) -> BatchTally
where
    P: FnMut(PathBuf) -> Fut,
    Fut: Future<Output = Outcome> + Send + 'static,
    F: FnMut(&Path, &Outcome),
{
    let mut tally = BatchTally {
        total: archives.len(),
        ..Default::default()
    };
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let mut tasks = JoinSet::new();
    let mut paths = HashMap::with_capacity(archives.len());

    for archive in archives {
        let semaphore = semaphore.clone();
        let work = process(archive.clone());
        let task_archive = archive.clone();
        let handle = tasks.spawn(async move {
            // The semaphore is never closed, so acquire only fails if it was
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return Outcome::Error("worker pool shut down".to_string());
            };
            tracing::debug!(archive = %task_archive.display(), "processing archive");
            work.await
        });
        paths.insert(handle.id(), archive);
    }

    while let Some(joined) = tasks.join_next_with_id().await {
        let (id, outcome) = match joined {
            Ok((id, outcome)) => (id, outcome),
            Err(e) => (e.id(), Outcome::Error(format!("unexpected worker failure: {e}"))),
        };
        let Some(archive) = paths.remove(&id) else {
            tracing::error!("completed task {} has no archive", id);
            continue;
        };

        tracing::debug!(archive = %archive.display(), outcome = %outcome, "archive finished");
        tally.record(&outcome);
        on_outcome(&archive, &outcome);
    }

    tally
}
