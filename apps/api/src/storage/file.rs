use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use super::{validate_key, KeyValueStore, StorageError};

/// Directory-backed store: each key lives in `<root>/<key>.json`.
///
/// Writes go to a uniquely named temporary file in the same directory and are
/// renamed into place, so readers never observe a half-written value.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = self.root.join(format!(".{key}.{}.tmp", Uuid::new_v4()));

        if let Err(e) = tokio::fs::write(&tmp, value.as_bytes()).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        debug!(key, bytes = value.len(), "stored value");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        assert_eq!(store.get("resume_1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStore::open(dir.path()).await.unwrap();
            store.set("resume_1", "{\"a\":1}".into()).await.unwrap();
        }
        let reopened = FileStore::open(dir.path()).await.unwrap();
        assert_eq!(
            reopened.get("resume_1").await.unwrap().as_deref(),
            Some("{\"a\":1}")
        );
    }

    #[tokio::test]
    async fn test_no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        store.set("k", "one".into()).await.unwrap();
        store.set("k", "two".into()).await.unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["k.json".to_string()]);
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        let err = store.get("../outside").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }
}
