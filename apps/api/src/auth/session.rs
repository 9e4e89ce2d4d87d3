use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{async_trait, extract::FromRequestParts, http::header, http::request::Parts};
use tokio::sync::{Mutex, RwLock};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::ExportGuard;
use crate::models::resume::ResumeDocument;
use crate::models::user::User;
use crate::state::AppState;

/// Everything scoped to one logged-in user: identity, the working document,
/// and the export latch. Created at login, dropped at logout.
#[derive(Debug)]
pub struct SessionContext {
    pub user: User,
    pub document: ResumeDocument,
    pub export_guard: ExportGuard,
}

pub type SharedSession = Arc<Mutex<SessionContext>>;

struct SessionEntry {
    user_id: String,
    context: SharedSession,
    last_seen: Instant,
}

#[derive(Default)]
struct Sessions {
    by_token: HashMap<Uuid, SessionEntry>,
    by_user: HashMap<String, Uuid>,
}

/// Bearer token → session.
///
/// A user holds at most one live session: opening a new one closes the
/// previous token. Sessions idle longer than the configured limit are swept.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<RwLock<Sessions>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(&self, user: User, document: ResumeDocument) -> Uuid {
        let token = Uuid::new_v4();
        let user_id = user.id.clone();
        let context = SessionContext {
            user,
            document,
            export_guard: ExportGuard::new(),
        };

        let mut sessions = self.inner.write().await;
        if let Some(previous) = sessions.by_user.insert(user_id.clone(), token) {
            sessions.by_token.remove(&previous);
            info!(user_id, "Replaced previous session");
        }
        sessions.by_token.insert(
            token,
            SessionEntry {
                user_id,
                context: Arc::new(Mutex::new(context)),
                last_seen: Instant::now(),
            },
        );
        token
    }

    /// Looks up a live session and marks it as used.
    pub async fn get(&self, token: &Uuid) -> Option<SharedSession> {
        let mut sessions = self.inner.write().await;
        let entry = sessions.by_token.get_mut(token)?;
        entry.last_seen = Instant::now();
        Some(entry.context.clone())
    }

    pub async fn close(&self, token: &Uuid) -> Option<SharedSession> {
        let mut sessions = self.inner.write().await;
        let entry = sessions.by_token.remove(token)?;
        if sessions.by_user.get(&entry.user_id) == Some(token) {
            sessions.by_user.remove(&entry.user_id);
        }
        Some(entry.context)
    }

    pub async fn session_count(&self) -> usize {
        self.inner.read().await.by_token.len()
    }

    /// Drops every session unused for longer than `max_idle`. Returns how many went.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.inner.write().await;
        let expired: Vec<(Uuid, String)> = sessions
            .by_token
            .iter()
            .filter(|(_, e)| now.duration_since(e.last_seen) > max_idle)
            .map(|(token, e)| (*token, e.user_id.clone()))
            .collect();

        for (token, user_id) in &expired {
            sessions.by_token.remove(token);
            if sessions.by_user.get(user_id) == Some(token) {
                sessions.by_user.remove(user_id);
            }
        }
        expired.len()
    }

    /// Sweeps idle sessions every `max_idle / 4` (at least once a second).
    /// Must be called from within a tokio runtime.
    pub fn spawn_idle_sweeper(&self, max_idle: Duration) {
        let registry = self.clone();
        let period = (max_idle / 4).max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let evicted = registry.evict_idle(max_idle).await;
                if evicted > 0 {
                    let remaining = registry.session_count().await;
                    info!(evicted, remaining, "Expired idle sessions");
                }
            }
        });
    }
}

/// Extractor resolving `Authorization: Bearer <token>` to a live session.
pub struct ActiveSession {
    pub token: Uuid,
    pub context: SharedSession,
}

#[async_trait]
impl FromRequestParts<AppState> for ActiveSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .and_then(|v| Uuid::parse_str(v.trim()).ok())
            .ok_or(AppError::Unauthorized)?;

        let context = state
            .sessions
            .get(&token)
            .await
            .ok_or(AppError::Unauthorized)?;

        Ok(Self { token, context })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
        }
    }

    #[tokio::test]
    async fn test_open_get_close() {
        let registry = SessionRegistry::new();
        let token = registry.open(user(), ResumeDocument::default()).await;

        let session = registry.get(&token).await.unwrap();
        assert_eq!(session.lock().await.user.id, "1");

        assert!(registry.close(&token).await.is_some());
        assert!(registry.get(&token).await.is_none());
    }

    fn other_user() -> User {
        User {
            id: "2".into(),
            name: "Grace".into(),
            email: "grace@example.com".into(),
        }
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let registry = SessionRegistry::new();
        let a = registry.open(user(), ResumeDocument::default()).await;
        let b = registry.open(other_user(), ResumeDocument::default()).await;
        assert_ne!(a, b);

        let sa = registry.get(&a).await.unwrap();
        sa.lock().await.document.personal_info.summary = "changed".into();
        let sb = registry.get(&b).await.unwrap();
        assert_eq!(sb.lock().await.document.personal_info.summary, "");
    }

    #[tokio::test]
    async fn test_relogin_replaces_previous_session() {
        let registry = SessionRegistry::new();
        let first = registry.open(user(), ResumeDocument::default()).await;
        let mut last = first;
        for _ in 0..500 {
            last = registry.open(user(), ResumeDocument::default()).await;
        }

        assert_eq!(registry.session_count().await, 1);
        assert!(registry.get(&first).await.is_none());
        assert!(registry.get(&last).await.is_some());
    }

    #[tokio::test]
    async fn test_closing_stale_token_keeps_current_session() {
        let registry = SessionRegistry::new();
        let old = registry.open(user(), ResumeDocument::default()).await;
        let current = registry.open(user(), ResumeDocument::default()).await;

        assert!(registry.close(&old).await.is_none());
        assert!(registry.get(&current).await.is_some());

        // The replacement is still tracked: a further login evicts it.
        registry.open(user(), ResumeDocument::default()).await;
        assert!(registry.get(&current).await.is_none());
        assert_eq!(registry.session_count().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_are_evicted() {
        let registry = SessionRegistry::new();
        let idle = registry.open(user(), ResumeDocument::default()).await;
        let active = registry.open(other_user(), ResumeDocument::default()).await;

        tokio::time::advance(Duration::from_secs(50)).await;
        registry.get(&active).await.unwrap();
        tokio::time::advance(Duration::from_secs(20)).await;

        assert_eq!(registry.evict_idle(Duration::from_secs(60)).await, 1);
        assert!(registry.get(&idle).await.is_none());
        assert!(registry.get(&active).await.is_some());

        // The evicted user can log in again.
        let again = registry.open(user(), ResumeDocument::default()).await;
        assert!(registry.get(&again).await.is_some());
        assert_eq!(registry.session_count().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_runs_in_background() {
        let registry = SessionRegistry::new();
        let token = registry.open(user(), ResumeDocument::default()).await;
        registry.spawn_idle_sweeper(Duration::from_secs(60));

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(registry.get(&token).await.is_none());
    }
}
