use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("file write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid export owner: {0:?}")]
    InvalidOwner(String),

    #[error("file write task failed: {0}")]
    Task(String),
}

/// The file-save boundary for finished PDFs.
///
/// Files are scoped by owner: two owners saving the same name never collide.
#[async_trait]
pub trait FileSink: Send + Sync {
    /// Stores `pdf` under `file_name` for `owner` and returns where it landed.
    /// A failed save must leave no partial file behind.
    async fn save(&self, owner: &str, file_name: &str, pdf: Bytes) -> Result<PathBuf, SinkError>;

    /// Reads back a previously saved file; `None` when the owner has no such file.
    async fn fetch(&self, owner: &str, file_name: &str) -> Result<Option<Bytes>, SinkError>;
}

/// Writes into `<dir>/<owner>/` through a temporary file that is renamed into place.
#[derive(Debug, Clone)]
pub struct FsSink {
    dir: PathBuf,
}

impl FsSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn owner_dir(&self, owner: &str) -> Result<PathBuf, SinkError> {
        let valid = !owner.is_empty()
            && owner
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(SinkError::InvalidOwner(owner.to_string()));
        }
        Ok(self.dir.join(owner))
    }
}

/// Reduces a caller-supplied name to a single path component ending in `.pdf`.
/// The result is also safe to quote in a `Content-Disposition` header.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if matches!(c, '/' | '\\' | '"') || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    let cleaned = cleaned.trim().trim_start_matches('.').trim();

    let stem = if cleaned.is_empty() { "resume" } else { cleaned };
    if stem.to_ascii_lowercase().ends_with(".pdf") {
        stem.to_string()
    } else {
        format!("{stem}.pdf")
    }
}

#[async_trait]
impl FileSink for FsSink {
    async fn save(&self, owner: &str, file_name: &str, pdf: Bytes) -> Result<PathBuf, SinkError> {
        let dir = self.owner_dir(owner)?;
        let target = dir.join(sanitize_file_name(file_name));

        tokio::task::spawn_blocking(move || -> Result<PathBuf, SinkError> {
            std::fs::create_dir_all(&dir)?;
            // Dropping the temp file on any early return deletes it.
            let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
            tmp.write_all(&pdf)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&target).map_err(|e| SinkError::Io(e.error))?;
            Ok(target)
        })
        .await
        .map_err(|e| SinkError::Task(e.to_string()))?
    }

    async fn fetch(&self, owner: &str, file_name: &str) -> Result<Option<Bytes>, SinkError> {
        let path = self.owner_dir(owner)?.join(sanitize_file_name(file_name));
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
