//! ledger-crawl main entry point
//!
//! This is the command-line interface for the ledger-crawl web crawler.

use anyhow::{bail, Context};
use clap::Parser;
use ledger_crawl::config::{parse_config, Config};
use ledger_crawl::crawler::run_crawl;
use ledger_crawl::output::print_statistics;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// ledger-crawl: a bounded-depth, same-domain web crawler
///
/// ledger-crawl follows links from a seed URL up to a maximum depth,
/// downloads pages, scripts and stylesheets hosted on the seed's domain, and
/// records every download in a state file so that later runs skip them.
#[derive(Parser, Debug)]
#[command(name = "ledger-crawl")]
#[command(version)]
#[command(about = "A bounded-depth, resumable web crawler", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from (https:// is assumed without a scheme)
    #[arg(short, long)]
    url: Option<String>,

    /// Maximum link depth to follow from the seed [default: 2]
    #[arg(short, long, allow_negative_numbers = true)]
    depth: Option<i64>,

    /// Number of concurrent workers, 1-100 [default: 4]
    #[arg(short, long)]
    parallelism: Option<u32>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// File recording downloaded URLs [default: crawler_state.txt]
    #[arg(long, value_name = "FILE")]
    state_file: Option<PathBuf>,

    /// Append-mode log file [default: webCrawlerLog.txt]
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Directory under which the download directory is created [default: .]
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Start a fresh crawl, ignoring URLs already in the state file
    #[arg(long)]
    fresh: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    // Keep the guard alive so buffered log lines are flushed on exit
    let _guard = match setup_logging(&config.output.log_file, cli.verbose, cli.quiet) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match handle_crawl(config, cli.fresh).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Crawl failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Loads the optional config file and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => parse_config(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(url) = &cli.url {
        config.set_seed(url);
    }
    if config.seed_url.is_empty() {
        bail!("URL can't be empty");
    }

    if let Some(depth) = cli.depth {
        if depth <= 0 {
            bail!("Depth should be greater than 0");
        }
        config.crawler.max_depth =
            u32::try_from(depth).with_context(|| format!("Depth {} is too large", depth))?;
    }

    if let Some(parallelism) = cli.parallelism {
        config.crawler.parallelism = parallelism;
    }
    if let Some(state_file) = &cli.state_file {
        config.output.state_file = state_file.clone();
    }
    if let Some(log_file) = &cli.log_file {
        config.output.log_file = log_file.clone();
    }
    if let Some(output_dir) = &cli.output_dir {
        config.output.download_root = output_dir.clone();
    }

    Ok(config)
}

/// Builds the verbosity filter
fn build_filter(verbose: u8, quiet: bool) -> EnvFilter {
    if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ledger_crawl=info,warn"),
            1 => EnvFilter::new("ledger_crawl=debug,info"),
            2 => EnvFilter::new("ledger_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    }
}

/// Sets up stdout and log-file output based on verbosity level
///
/// The log file is opened in append mode and never rotated.
fn setup_logging(log_file: &Path, verbose: u8, quiet: bool) -> anyhow::Result<WorkerGuard> {
    let directory = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = log_file
        .file_name()
        .with_context(|| format!("Log file path {} has no file name", log_file.display()))?;

    std::fs::create_dir_all(&directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

    let appender = tracing_appender::rolling::never(&directory, file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(false)
        .with_filter(build_filter(verbose, quiet));

    let stdout_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_filter(build_filter(verbose, quiet));

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, fresh: bool) -> anyhow::Result<()> {
    if fresh {
        tracing::info!("Starting fresh crawl (ignoring previous state)");
    } else {
        tracing::info!(
            "Starting crawl (skipping URLs recorded in {})",
            config.output.state_file.display()
        );
    }

    let stats = run_crawl(config, fresh).await?;
    print_statistics(&stats);

    Ok(())
}
