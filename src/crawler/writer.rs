//! Content writer
//!
//! Saves fetched documents into the per-crawl download directory. Files are
//! named after the last path segment of their URL and written through a
//! temporary `.part` file, so a crash never leaves a half-written document
//! under its final name.

use crate::url::file_name_for;
use crate::CrawlError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::AsyncWriteExt;
use url::Url;

/// Distinguishes concurrent writes that map to the same file name
static PART_SEQ: AtomicU64 = AtomicU64::new(0);

/// Destination for downloaded content
#[async_trait]
pub trait ContentWriter: Send + Sync {
    /// Durably stores `body` under a name derived from `url`
    ///
    /// Returns the path the content was written to.
    async fn write(&self, url: &Url, body: &[u8]) -> Result<PathBuf, CrawlError>;
}

/// [`ContentWriter`] that writes into a directory on the local filesystem
#[derive(Debug, Clone)]
pub struct FileWriter {
    dir: PathBuf,
}

impl FileWriter {
    /// Creates a writer targeting `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates the target directory if it does not exist yet
    pub async fn prepare(&self) -> Result<(), CrawlError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// The directory files are written to
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a URL's content is saved under
    pub fn target_for(&self, url: &Url) -> PathBuf {
        self.dir.join(file_name_for(url))
    }
}

#[async_trait]
impl ContentWriter for FileWriter {
    async fn write(&self, url: &Url, body: &[u8]) -> Result<PathBuf, CrawlError> {
        let target = self.target_for(url);
        let seq = PART_SEQ.fetch_add(1, Ordering::Relaxed);
        let partial = self
            .dir
            .join(format!("{}.{}.part", file_name_for(url), seq));

        let mut file = tokio::fs::File::create(&partial).await?;
        let result = async {
            file.write_all(body).await?;
            file.flush().await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::rename(&partial, &target).await
        }
        .await;

        if let Err(e) = result {
            if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
                tracing::debug!("Could not remove {}: {}", partial.display(), cleanup);
            }
            return Err(e.into());
        }

        Ok(target)
    }
}
