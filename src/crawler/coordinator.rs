//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the traversal engine that coordinates all aspects of
//! a crawl run, including:
//! - Validating the configuration and preparing the download directory
//! - Processing the seed before any worker starts
//! - Running the worker pool over the shared frontier
//! - Per-task fetch, download, and link-following decisions
//! - Collecting run statistics

use crate::config::{validate, Config};
use crate::crawler::fetcher::{FetchedContent, Fetcher, HttpFetcher};
use crate::crawler::parser::extract_hrefs_from_bytes;
use crate::crawler::scheduler::Frontier;
use crate::crawler::writer::{ContentWriter, FileWriter};
use crate::output::{CrawlStatistics, StatsRecorder};
use crate::state::{CrawlTask, DownloadLedger, TaskState, VisitedSet};
use crate::url::{parse_seed, resolve, same_domain};
use crate::{CrawlError, FetchError};
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// Everything a crawl run shares between its workers
struct CrawlContext {
    config: Config,
    seed: Url,
    visited: VisitedSet,
    ledger: DownloadLedger,
    frontier: Frontier,
    fetcher: Arc<dyn Fetcher>,
    writer: Arc<dyn ContentWriter>,
    stats: StatsRecorder,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    context: Arc<CrawlContext>,
}

impl Coordinator {
    /// Creates a coordinator with explicit collaborators
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration (validated here)
    /// * `fetcher` - Source of page content
    /// * `writer` - Destination for downloaded content
    /// * `ledger` - The already-loaded download ledger
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(CrawlError)` - The configuration or seed URL is invalid
    pub fn new(
        config: Config,
        fetcher: Arc<dyn Fetcher>,
        writer: Arc<dyn ContentWriter>,
        ledger: DownloadLedger,
    ) -> Result<Self, CrawlError> {
        validate(&config)?;
        let seed = parse_seed(&config.seed_url)?;

        Ok(Self {
            context: Arc::new(CrawlContext {
                config,
                seed,
                visited: VisitedSet::new(),
                ledger,
                frontier: Frontier::new(),
                fetcher,
                writer,
                stats: StatsRecorder::new(),
            }),
        })
    }

    /// Creates a coordinator that fetches over HTTP and writes to disk
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `fresh` - Ignore the entries already recorded in the state file
    pub async fn from_config(config: Config, fresh: bool) -> Result<Self, CrawlError> {
        validate(&config)?;

        let fetcher = HttpFetcher::new(&config)?;

        let writer = FileWriter::new(config.download_dir());
        writer.prepare().await?;
        tracing::info!("Saving downloads to {}", writer.dir().display());

        let state_file = config.output.state_file.clone();
        let ledger = if fresh {
            DownloadLedger::fresh(state_file)
        } else {
            DownloadLedger::load(state_file)
        };

        Self::new(config, Arc::new(fetcher), Arc::new(writer), ledger)
    }

    /// Runs the crawl until the frontier is exhausted
    ///
    /// The seed is processed first on the calling task; if it cannot be
    /// fetched the run fails. Its children are then drained by
    /// `parallelism` workers. Failures of individual non-seed tasks are
    /// logged and counted but never fail the run.
    pub async fn run(self) -> Result<CrawlStatistics, CrawlError> {
        let context = self.context;
        let start_time = Instant::now();

        tracing::info!(
            "Starting crawl of {} (max depth {}, {} workers)",
            context.seed,
            context.config.crawler.max_depth,
            context.config.crawler.parallelism
        );

        let seed = CrawlTask::seed(context.seed.clone());
        context.visited.try_mark_visited(seed.url.as_str());

        match process_task(&context, &seed).await {
            Ok(state) => context.stats.record_task(state),
            Err(e) => {
                tracing::error!("Failed to fetch seed URL {}: {}", seed.url, e);
                context.stats.record_task(TaskState::Failed);
                return Err(CrawlError::SeedUnreachable(e));
            }
        }

        let workers: Vec<_> = (0..context.config.crawler.parallelism)
            .map(|id| tokio::spawn(worker_loop(Arc::clone(&context), id)))
            .collect();

        for worker in workers {
            worker.await?;
        }

        let stats = context.stats.snapshot(start_time.elapsed());
        tracing::info!(
            "Crawl completed: {} tasks in {:?} ({} downloaded, {} failed)",
            stats.total_tasks(),
            stats.elapsed,
            stats.count(TaskState::Downloaded),
            stats.count(TaskState::Failed)
        );

        Ok(stats)
    }
}

/// Completes a frontier task even if processing panics
struct Completion<'a>(&'a Frontier);

impl Drop for Completion<'_> {
    fn drop(&mut self) {
        self.0.complete();
    }
}

/// Pulls tasks from the frontier until it is exhausted
async fn worker_loop(context: Arc<CrawlContext>, id: u32) {
    tracing::debug!("Worker {} started", id);

    while let Some(task) = context.frontier.next().await {
        let _completion = Completion(&context.frontier);

        let state = match process_task(&context, &task).await {
            Ok(state) => state,
            Err(FetchError::Transport { timeout: true, .. }) => {
                tracing::warn!("Timed out fetching {}", task.url);
                TaskState::Failed
            }
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", task.url, e);
                TaskState::Failed
            }
        };
        context.stats.record_task(state);
    }

    tracing::debug!("Worker {} finished", id);
}

/// Logs a task state change
fn transition(task: &CrawlTask, from: TaskState, to: TaskState) -> TaskState {
    debug_assert!(from.can_transition_to(to), "{} -> {}", from, to);
    tracing::trace!("{} (depth {}): {} -> {}", task.url, task.depth, from, to);
    to
}

/// Processes a single task
///
/// This method:
/// 1. Fetches the content
/// 2. Downloads it if it is an allowed, same-domain, not yet recorded document
/// 3. Extracts links from HTML and enqueues them relative to the final URL
///
/// Tasks beyond the depth bound never reach the frontier; they are skipped
/// in [`enqueue_links`].
///
/// A fetch failure is returned to the caller, which decides whether it is
/// fatal. Every other failure is folded into the returned state.
async fn process_task(context: &CrawlContext, task: &CrawlTask) -> Result<TaskState, FetchError> {
    transition(task, TaskState::Pending, TaskState::Fetching);
    tracing::info!("Visiting {} (depth {})", task.url, task.depth);

    let content = context.fetcher.fetch(&task.url).await?;

    let mut state = TaskState::Parsed;
    if should_download(context, task, &content) {
        state = download(context, task, &content).await;
    }

    if content.is_html() {
        let hrefs = extract_hrefs_from_bytes(&content.body);
        tracing::debug!("Found {} links on {}", hrefs.len(), task.url);
        enqueue_links(context, task, &content.final_url, &hrefs);
    }

    Ok(transition(task, TaskState::Fetching, state))
}

/// Decides whether fetched content is written to disk
fn should_download(context: &CrawlContext, task: &CrawlTask, content: &FetchedContent) -> bool {
    if !context
        .config
        .crawler
        .is_allowed_content_type(&content.content_type)
    {
        tracing::debug!(
            "Not downloading {}: content type {:?} not allowed",
            task.url,
            content.content_type
        );
        return false;
    }

    let seed = context.seed.as_str();
    if !same_domain(seed, task.url.as_str()) || !same_domain(seed, &content.final_url) {
        tracing::debug!(
            "Not downloading {}: served from {} outside the seed domain",
            task.url,
            content.final_url
        );
        return false;
    }

    if context.ledger.contains(task.url.as_str()) {
        tracing::debug!("Already downloaded {}", task.url);
        context.stats.record_already_downloaded();
        return false;
    }

    true
}

/// Writes content to disk and records it in the ledger
async fn download(context: &CrawlContext, task: &CrawlTask, content: &FetchedContent) -> TaskState {
    let path = match context.writer.write(&task.url, &content.body).await {
        Ok(path) => path,
        Err(e) => {
            tracing::error!("Failed to save {}: {}", task.url, e);
            return TaskState::Failed;
        }
    };

    tracing::info!("Downloaded {} to {}", task.url, path.display());

    if let Err(e) = context.ledger.append(task.url.as_str()).await {
        tracing::error!("Failed to record {} in state file: {}", task.url, e);
        context.stats.record_ledger_error();
    }

    TaskState::Downloaded
}

/// Turns raw links into child tasks
///
/// Links are resolved against `base`, the URL the page was finally served
/// from. A link becomes a task only if it resolves to an http(s) URL on the
/// seed's host, lies within the depth bound, and has not been queued before.
/// Children beyond the bound move straight from `Pending` to `Skipped`.
fn enqueue_links(context: &CrawlContext, task: &CrawlTask, base: &str, hrefs: &[String]) {
    context.stats.record_links_discovered(hrefs.len() as u64);

    let max_depth = context.config.crawler.max_depth;
    for href in hrefs {
        let Some(resolved) = resolve(base, href) else {
            tracing::debug!("Could not resolve link {:?} on {}", href, base);
            continue;
        };

        let mut url = match Url::parse(&resolved) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Skipping malformed link {}: {}", resolved, e);
                continue;
            }
        };

        if url.scheme() != "http" && url.scheme() != "https" {
            continue;
        }

        if !same_domain(context.seed.as_str(), url.as_str()) {
            tracing::trace!("Skipping off-domain link {}", url);
            context.stats.record_off_domain();
            continue;
        }

        url.set_fragment(None);
        let child = task.child(url);

        if child.exceeds(max_depth) {
            tracing::trace!("Skipping {} beyond max depth", child.url);
            let state = transition(&child, TaskState::Pending, TaskState::Skipped);
            context.stats.record_task(state);
            context.stats.record_pruned();
            continue;
        }

        if !context.visited.try_mark_visited(child.url.as_str()) {
            context.stats.record_duplicate();
            continue;
        }

        tracing::debug!("Queued {} at depth {}", child.url, child.depth);
        context.frontier.push(child);
    }
}

/// Runs the main crawl operation
///
/// # Example
///
/// ```no_run
/// use ledger_crawl::config::Config;
/// use ledger_crawl::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::new("https://example.com");
/// let stats = run_crawl(config, false).await?;
/// println!("{} tasks", stats.total_tasks());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, fresh: bool) -> Result<CrawlStatistics, CrawlError> {
    Coordinator::from_config(config, fresh).await?.run().await
}
