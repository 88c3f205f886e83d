//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlTask` / `TaskState`: one unit of traversal work and its lifecycle
//! - `VisitedSet`: run-scoped, exactly-once enqueue gate
//! - `DownloadLedger`: durable, cross-run record of completed downloads

mod ledger;
mod task_state;
mod visited;

// Re-export main types
pub use ledger::DownloadLedger;
pub use task_state::{CrawlTask, TaskState};
pub use visited::VisitedSet;
