//! Durable key-value storage and the resume persistence adapter built on it.
//!
//! `KeyValueStore` is the opaque collaborator standing in for local-device
//! storage. `FileStore` backs it with one JSON file per key; `MemoryStore` is
//! used by tests. Keys are restricted to `[A-Za-z0-9_-]`.

pub mod file;
pub mod memory;
pub mod repository;
pub mod writer;

use async_trait::async_trait;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use repository::ResumeRepository;
pub use writer::WriteBehind;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored value could not be encoded or decoded: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("storage task failed: {0}")]
    Task(String),
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
}

pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key_accepts_user_scoped_keys() {
        assert!(validate_key("resume_1718000000000").is_ok());
        assert!(validate_key("resumeUsers").is_ok());
    }

    #[test]
    fn test_validate_key_rejects_paths_and_empty() {
        assert!(matches!(validate_key(""), Err(StorageError::InvalidKey(_))));
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key("with space").is_err());
    }
}
