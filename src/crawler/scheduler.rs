//! Shared crawl frontier
//!
//! This module handles:
//! - The FIFO queue of pending crawl tasks
//! - Tracking how many tasks are queued or still being processed
//! - Termination detection: the crawl is over once nothing is queued and
//!   no worker is processing a task that could still enqueue children

use crate::state::CrawlTask;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Work queue shared by all crawl workers
///
/// Every pushed task counts as outstanding until a worker calls
/// [`Frontier::complete`] for it. Workers must push a task's children before
/// completing it, otherwise the frontier may report exhaustion early.
#[derive(Debug, Default)]
pub struct Frontier {
    /// Tasks waiting for a worker
    queue: Mutex<VecDeque<CrawlTask>>,

    /// Tasks pushed but not yet completed (queued plus in progress)
    outstanding: AtomicUsize,

    /// Wakes idle workers on new work or exhaustion
    notify: Notify,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a task to the back of the queue
    pub fn push(&self, task: CrawlTask) {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        self.queue.lock().push_back(task);
        self.notify.notify_one();
    }

    /// Waits for the next task
    ///
    /// # Returns
    ///
    /// * `Some(CrawlTask)` - A task to process; the caller must later call
    ///   [`Frontier::complete`]
    /// * `None` - The frontier is exhausted and no task is outstanding
    pub async fn next(&self) -> Option<CrawlTask> {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register before checking so a push or final completion that
            // lands between the check and the await is not missed
            notified.as_mut().enable();

            if let Some(task) = self.queue.lock().pop_front() {
                return Some(task);
            }

            if self.outstanding.load(Ordering::SeqCst) == 0 {
                // Pass the wake-up along to any other idle worker
                self.notify.notify_waiters();
                return None;
            }

            notified.await;
        }
    }

    /// Marks a task returned by [`Frontier::next`] as finished
    pub fn complete(&self) {
        let previous = self.outstanding.fetch_sub(1, Ordering::SeqCst);
        if previous == 1 {
            tracing::debug!("Frontier exhausted, waking idle workers");
            self.notify.notify_waiters();
        }
    }

    /// Number of tasks waiting in the queue
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// Number of tasks pushed but not yet completed
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }
}
