//! Crawl task definitions and the per-task state machine
//!
//! Every task moves `Pending -> Fetching -> {Parsed, Failed, Downloaded, Skipped}`.

use std::fmt;
use url::Url;

/// One unit of traversal work: a URL and its distance from the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    /// The URL to fetch
    pub url: Url,

    /// Number of hops from the seed (the seed itself is depth 0)
    pub depth: u32,
}

impl CrawlTask {
    /// Creates the depth-0 task for the seed URL
    pub fn seed(url: Url) -> Self {
        Self { url, depth: 0 }
    }

    /// Creates a task for a link found on this task's page
    pub fn child(&self, url: Url) -> Self {
        Self {
            url,
            depth: self.depth + 1,
        }
    }

    /// Returns true if this task lies beyond the depth bound
    pub fn exceeds(&self, max_depth: u32) -> bool {
        self.depth > max_depth
    }
}

/// Represents the current state of a crawl task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    // ===== Active States =====
    /// Task has been created and queued
    Pending,

    /// Content is being fetched
    Fetching,

    // ===== Terminal States =====
    /// Content was fetched and its links (if any) were extracted
    Parsed,

    /// Content was fetched, written to disk, and recorded in the ledger
    Downloaded,

    /// Fetch or download failed
    Failed,

    /// Task exceeded the depth bound and was dropped without fetching
    Skipped,
}

impl TaskState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::Fetching)
    }

    /// Checks whether moving from `self` to `next` is allowed
    pub fn can_transition_to(&self, next: TaskState) -> bool {
        match self {
            Self::Pending => matches!(next, Self::Fetching | Self::Skipped),
            Self::Fetching => matches!(next, Self::Parsed | Self::Downloaded | Self::Failed),
            _ => false,
        }
    }

    /// Stable lowercase label, used in logs and statistics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Parsed => "parsed",
            Self::Downloaded => "downloaded",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }

    /// Returns all terminal states
    pub fn terminal_states() -> [Self; 4] {
        [Self::Parsed, Self::Downloaded, Self::Failed, Self::Skipped]
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(path: &str) -> Url {
        Url::parse(&format!("https://example.com{}", path)).unwrap()
    }

    #[test]
    fn test_seed_task() {
        let task = CrawlTask::seed(url("/"));
        assert_eq!(task.depth, 0);
    }

    #[test]
    fn test_child_depth_increments() {
        let seed = CrawlTask::seed(url("/"));
        let child = seed.child(url("/a"));
        let grandchild = child.child(url("/b"));
        assert_eq!(child.depth, 1);
        assert_eq!(grandchild.depth, 2);
    }

    #[test]
    fn test_exceeds() {
        let task = CrawlTask {
            url: url("/deep"),
            depth: 3,
        };
        assert!(task.exceeds(2));
        assert!(!task.exceeds(3));
    }

    #[test]
    fn test_is_terminal() {
        assert!(!TaskState::Pending.is_terminal());
        assert!(!TaskState::Fetching.is_terminal());

        for state in TaskState::terminal_states() {
            assert!(state.is_terminal(), "{} should be terminal", state);
        }
    }

    #[test]
    fn test_transitions() {
        assert!(TaskState::Pending.can_transition_to(TaskState::Fetching));
        assert!(TaskState::Pending.can_transition_to(TaskState::Skipped));
        assert!(!TaskState::Pending.can_transition_to(TaskState::Downloaded));

        assert!(TaskState::Fetching.can_transition_to(TaskState::Parsed));
        assert!(TaskState::Fetching.can_transition_to(TaskState::Downloaded));
        assert!(TaskState::Fetching.can_transition_to(TaskState::Failed));
        assert!(!TaskState::Fetching.can_transition_to(TaskState::Skipped));

        for state in TaskState::terminal_states() {
            assert!(!state.can_transition_to(TaskState::Fetching));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", TaskState::Downloaded), "downloaded");
        assert_eq!(format!("{}", TaskState::Skipped), "skipped");
    }
}
