use dashmap::DashSet;

/// Run-scoped set of URLs that have already been queued
///
/// Marking happens on enqueue, so a URL counts as visited from the moment it
/// is discovered, whatever its fetch outcome turns out to be.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: DashSet<String>,
}

impl VisitedSet {
    /// Creates an empty visited set
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically checks and marks a URL
    ///
    /// Returns true iff this call is the first to mark `url` in this run.
    /// Callers enqueue the URL only on `true`.
    pub fn try_mark_visited(&self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    /// Returns true if the URL has been marked
    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Number of URLs marked so far
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Returns true if nothing has been marked
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
