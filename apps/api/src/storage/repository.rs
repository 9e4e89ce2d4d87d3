use std::sync::Arc;

use tracing::debug;

use super::{KeyValueStore, StorageError};
use crate::models::resume::{PersonalInfo, ResumeDocument};
use crate::models::user::User;

/// Persistence adapter for resume documents, keyed by user id.
#[derive(Clone)]
pub struct ResumeRepository {
    store: Arc<dyn KeyValueStore>,
}

pub fn resume_key(user_id: &str) -> String {
    format!("resume_{user_id}")
}

impl ResumeRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self, user_id: &str) -> Result<Option<ResumeDocument>, StorageError> {
        let Some(raw) = self.store.get(&resume_key(user_id)).await? else {
            return Ok(None);
        };
        let doc = serde_json::from_str(&raw)?;
        Ok(Some(doc))
    }

    pub async fn save(&self, user_id: &str, doc: &ResumeDocument) -> Result<(), StorageError> {
        let raw = serde_json::to_string(doc)?;
        self.store.set(&resume_key(user_id), raw).await?;
        debug!(user_id, "resume saved");
        Ok(())
    }

    /// Loads the stored document, falling back to `default_for(user)`.
    pub async fn load_or_default(&self, user: &User) -> Result<ResumeDocument, StorageError> {
        Ok(self
            .load(&user.id)
            .await?
            .unwrap_or_else(|| default_for(user)))
    }
}

/// The starting document for a user with nothing stored: empty sections, with
/// the name split on the first space into first/last and the email carried over.
pub fn default_for(user: &User) -> ResumeDocument {
    let mut parts = user.name.split(' ');
    let first_name = parts.next().unwrap_or_default().to_string();
    let last_name = parts.collect::<Vec<_>>().join(" ");

    ResumeDocument {
        personal_info: PersonalInfo {
            first_name,
            last_name,
            email: user.email.clone(),
            ..PersonalInfo::default()
        },
        ..ResumeDocument::default()
    }
}
