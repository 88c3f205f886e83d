//! Run statistics
//!
//! Workers record outcomes into a shared [`StatsRecorder`]; when the frontier
//! drains, the coordinator takes a [`CrawlStatistics`] snapshot and hands it
//! back to the caller.

use crate::state::TaskState;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlStatistics {
    /// Count of tasks by terminal state
    pub tasks_by_state: HashMap<TaskState, u64>,

    /// Number of raw links found on HTML pages
    pub links_discovered: u64,

    /// Links dropped because they resolved to another host
    pub links_off_domain: u64,

    /// Links dropped because the URL was already queued this run
    pub links_duplicate: u64,

    /// Links dropped because they would exceed the depth bound
    pub links_pruned: u64,

    /// Fetched documents not rewritten because the ledger already held them
    pub already_downloaded: u64,

    /// Ledger appends that failed after a successful write
    pub ledger_errors: u64,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl CrawlStatistics {
    /// Number of tasks that ended in `state`
    pub fn count(&self, state: TaskState) -> u64 {
        self.tasks_by_state.get(&state).copied().unwrap_or(0)
    }

    /// Total number of tasks that reached a terminal state
    pub fn total_tasks(&self) -> u64 {
        self.tasks_by_state.values().sum()
    }
}

/// Lock-free counters shared by all workers of a run
#[derive(Debug, Default)]
pub struct StatsRecorder {
    parsed: AtomicU64,
    downloaded: AtomicU64,
    failed: AtomicU64,
    skipped: AtomicU64,
    links_discovered: AtomicU64,
    links_off_domain: AtomicU64,
    links_duplicate: AtomicU64,
    links_pruned: AtomicU64,
    already_downloaded: AtomicU64,
    ledger_errors: AtomicU64,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a task reaching a terminal state
    pub fn record_task(&self, state: TaskState) {
        let counter = match state {
            TaskState::Parsed => &self.parsed,
            TaskState::Downloaded => &self.downloaded,
            TaskState::Failed => &self.failed,
            TaskState::Skipped => &self.skipped,
            TaskState::Pending | TaskState::Fetching => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_links_discovered(&self, count: u64) {
        self.links_discovered.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_off_domain(&self) {
        self.links_off_domain.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_duplicate(&self) {
        self.links_duplicate.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_pruned(&self) {
        self.links_pruned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_already_downloaded(&self) {
        self.already_downloaded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ledger_error(&self) {
        self.ledger_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Takes a point-in-time copy of all counters
    pub fn snapshot(&self, elapsed: Duration) -> CrawlStatistics {
        let mut tasks_by_state = HashMap::new();
        for (state, counter) in [
            (TaskState::Parsed, &self.parsed),
            (TaskState::Downloaded, &self.downloaded),
            (TaskState::Failed, &self.failed),
            (TaskState::Skipped, &self.skipped),
        ] {
            let count = counter.load(Ordering::Relaxed);
            if count > 0 {
                tasks_by_state.insert(state, count);
            }
        }

        CrawlStatistics {
            tasks_by_state,
            links_discovered: self.links_discovered.load(Ordering::Relaxed),
            links_off_domain: self.links_off_domain.load(Ordering::Relaxed),
            links_duplicate: self.links_duplicate.load(Ordering::Relaxed),
            links_pruned: self.links_pruned.load(Ordering::Relaxed),
            already_downloaded: self.already_downloaded.load(Ordering::Relaxed),
            ledger_errors: self.ledger_errors.load(Ordering::Relaxed),
            elapsed,
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Tasks by State:");
    for state in TaskState::terminal_states() {
        println!("  {}: {}", state, stats.count(state));
    }
    println!();

    println!("Links:");
    println!("  Discovered: {}", stats.links_discovered);
    println!("  Off-domain: {}", stats.links_off_domain);
    println!("  Duplicate: {}", stats.links_duplicate);
    println!("  Beyond max depth: {}", stats.links_pruned);
    println!();

    println!(
        "Already downloaded in a previous run: {}",
        stats.already_downloaded
    );
    if stats.ledger_errors > 0 {
        println!("Ledger write failures: {}", stats.ledger_errors);
    }

    println!(
        "Finished {} tasks in {:.1}s",
        stats.total_tasks(),
        stats.elapsed.as_secs_f64()
    );
}
