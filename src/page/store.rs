//! Flat-file page store
//!
//! Each page lives in `<dir>/<title>.txt` as raw bytes. There is no locking:
//! concurrent saves to the same title race and the last write wins.

use super::{Page, Title};
use std::io;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

const RECORD_EXTENSION: &str = "txt";

#[cfg(unix)]
const RECORD_MODE: u32 = 0o600;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("page '{title}' not found")]
    NotFound { title: String },
    #[error("failed to read '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Loads and saves pages under a single directory
#[derive(Debug, Clone)]
pub struct PageStore {
    dir: PathBuf,
}

impl PageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Record path for a title; titles are alphanumeric so this never leaves `dir`
    pub fn record_path(&self, title: &Title) -> PathBuf {
        self.dir.join(format!("{}.{RECORD_EXTENSION}", title.as_str()))
    }

    pub async fn load(&self, title: &Title) -> Result<Page, StoreError> {
        let path = self.record_path(title);
        match fs::read(&path).await {
            Ok(body) => Ok(Page::new(title.clone(), body)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound {
                title: title.to_string(),
            }),
            Err(source) => Err(StoreError::Read { path, source }),
        }
    }

    /// Create or truncate the record and write the page body
    pub async fn save(&self, page: &Page) -> Result<(), StoreError> {
        let path = self.record_path(&page.title);
        let result = async {
            let mut options = fs::OpenOptions::new();
            options.write(true).create(true).truncate(true);
            #[cfg(unix)]
            options.mode(RECORD_MODE);

            let mut file = options.open(&path).await?;
            file.write_all(&page.body).await?;
            file.flush().await
        }
        .await;

        result.map_err(|source| StoreError::Write { path, source })
    }
}
