//! Credential checks behind a swappable trait.
//!
//! `LocalCredentialStore` keeps registered users as a JSON list under the
//! `resumeUsers` key of the same key-value store that holds resumes. It is a
//! local mock of an identity provider: a real provider only has to implement
//! `CredentialStore`, nothing in the document or export code changes.

use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

use crate::models::user::{CredentialRecord, User};
use crate::resume::IdSource;
use crate::storage::{KeyValueStore, StorageError};

pub const CREDENTIALS_KEY: &str = "resumeUsers";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("name, email and password are all required")]
    MissingFields,

    #[error("email already registered")]
    EmailTaken,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn register(&self, name: &str, email: &str, secret: &str) -> Result<User, AuthError>;
    async fn verify(&self, email: &str, secret: &str) -> Result<User, AuthError>;
}

pub struct LocalCredentialStore {
    store: Arc<dyn KeyValueStore>,
    ids: Arc<IdSource>,
    // Serializes the read-modify-write of the credential list.
    write_lock: Mutex<()>,
}

impl LocalCredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>, ids: Arc<IdSource>) -> Self {
        Self {
            store,
            ids,
            write_lock: Mutex::new(()),
        }
    }

    async fn records(&self) -> Result<Vec<CredentialRecord>, StorageError> {
        match self.store.get(CREDENTIALS_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }
}

fn hash_secret(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[async_trait]
impl CredentialStore for LocalCredentialStore {
    async fn register(&self, name: &str, email: &str, secret: &str) -> Result<User, AuthError> {
        if name.is_empty() || email.is_empty() || secret.is_empty() {
            return Err(AuthError::MissingFields);
        }

        let _guard = self.write_lock.lock().await;
        let mut records = self.records().await?;
        if records.iter().any(|r| r.email == email) {
            return Err(AuthError::EmailTaken);
        }

        let record = CredentialRecord {
            id: self.ids.next_id(),
            name: name.to_string(),
            email: email.to_string(),
            secret_hash: hash_secret(secret),
        };
        let user = record.to_user();
        records.push(record);
        self.store
            .set(CREDENTIALS_KEY, serde_json::to_string(&records).map_err(StorageError::from)?)
            .await?;

        info!(user_id = %user.id, "Registered user");
        Ok(user)
    }

    async fn verify(&self, email: &str, secret: &str) -> Result<User, AuthError> {
        if email.is_empty() || secret.is_empty() {
            return Err(AuthError::MissingFields);
        }
        let digest = hash_secret(secret);
        self.records()
            .await?
            .iter()
            .find(|r| r.email == email && r.secret_hash == digest)
            .map(CredentialRecord::to_user)
            .ok_or(AuthError::InvalidCredentials)
    }
}
