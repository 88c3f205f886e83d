//! Durable record of completed downloads
//!
//! The ledger is a plain-text state file holding one absolute URL per line,
//! in download completion order. It is read once at startup and appended to
//! after every successful download, so a later run can skip anything already
//! on disk.
//!
//! A crash in the middle of an append can leave a final line without its
//! terminating newline. Such a line is never trusted: it is ignored on load,
//! and cut off before the next append so it cannot fuse with a new entry.

use crate::LedgerError;
use dashmap::DashSet;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Parsed contents of a state file
#[derive(Debug, Default, PartialEq, Eq)]
struct LedgerContents {
    /// Complete entries, in file order
    entries: Vec<String>,

    /// Byte length of the file up to (and including) the last newline, when
    /// an unterminated trailing line follows it
    torn_at: Option<u64>,
}

/// Splits state-file bytes into complete entries
fn parse_contents(bytes: &[u8]) -> LedgerContents {
    let complete_len = match bytes.iter().rposition(|&b| b == b'\n') {
        Some(idx) => idx + 1,
        None => 0,
    };

    let torn_at = (complete_len < bytes.len()).then_some(complete_len as u64);

    let entries = String::from_utf8_lossy(&bytes[..complete_len])
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    LedgerContents { entries, torn_at }
}

/// Reads the state file at `path`
///
/// A missing file yields empty contents rather than an error.
fn read_contents(path: &Path) -> Result<Option<LedgerContents>, LedgerError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(parse_contents(&bytes))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(LedgerError::Io {
            path: path.display().to_string(),
            source,
        }),
    }
}

/// Write-side state, guarded so appends never interleave
#[derive(Debug)]
struct LedgerTail {
    torn_at: Option<u64>,
}

/// Append-only ledger of downloaded URLs with an in-memory mirror
#[derive(Debug)]
pub struct DownloadLedger {
    path: PathBuf,
    entries: DashSet<String>,
    tail: Mutex<LedgerTail>,
}

impl DownloadLedger {
    /// Loads the ledger stored at `path`
    ///
    /// A missing state file starts an empty ledger. Read errors are logged and
    /// also start an empty ledger; the crawl then simply re-downloads.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let contents = match read_contents(&path) {
            Ok(Some(contents)) => {
                tracing::info!(
                    "Loaded {} downloaded URLs from state file {}",
                    contents.entries.len(),
                    path.display()
                );
                contents
            }
            Ok(None) => {
                tracing::info!(
                    "State file {} not found, starting fresh",
                    path.display()
                );
                LedgerContents::default()
            }
            Err(e) => {
                tracing::error!("Failed to read state file: {}", e);
                LedgerContents::default()
            }
        };

        if contents.torn_at.is_some() {
            tracing::warn!(
                "State file {} ends with an incomplete entry, ignoring it",
                path.display()
            );
        }

        Self {
            path,
            entries: contents.entries.into_iter().collect(),
            tail: Mutex::new(LedgerTail {
                torn_at: contents.torn_at,
            }),
        }
    }

    /// Opens the ledger at `path` without trusting its existing entries
    ///
    /// New downloads are still appended to the file.
    pub fn fresh(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let torn_at = read_contents(&path)
            .ok()
            .flatten()
            .and_then(|contents| contents.torn_at);

        tracing::info!(
            "Ignoring previous entries in state file {}, starting fresh",
            path.display()
        );

        Self {
            path,
            entries: DashSet::new(),
            tail: Mutex::new(LedgerTail { torn_at }),
        }
    }

    /// Returns true if `url` was loaded at startup or appended during this run
    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains(url)
    }

    /// Durably appends `url` to the state file and records it in memory
    ///
    /// Appending a URL that is already present writes a duplicate line, which
    /// later loads collapse.
    pub async fn append(&self, url: &str) -> Result<(), LedgerError> {
        let mut tail = self.tail.lock().await;

        let io_err = |source| LedgerError::Io {
            path: self.path.display().to_string(),
            source,
        };

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(io_err)?;

        if let Some(len) = tail.torn_at {
            file.set_len(len).await.map_err(io_err)?;
            tail.torn_at = None;
        }

        let line = format!("{}\n", url);
        file.write_all(line.as_bytes()).await.map_err(io_err)?;
        file.flush().await.map_err(io_err)?;
        file.sync_data().await.map_err(io_err)?;

        self.entries.insert(url.to_string());
        Ok(())
    }

    /// Number of distinct URLs known to the ledger
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the ledger holds no URLs
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
