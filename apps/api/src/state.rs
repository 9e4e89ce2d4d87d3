use std::sync::Arc;

use crate::auth::{CredentialStore, LocalCredentialStore, SessionRegistry};
use crate::config::Config;
use crate::export::{BitmapRasterizer, ExportPipeline, FsSink};
use crate::resume::IdSource;
use crate::storage::{KeyValueStore, ResumeRepository, WriteBehind};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub repository: ResumeRepository,
    /// Ordered background writer for mutation snapshots.
    pub writer: WriteBehind,
    /// Pluggable credential backend. Default: LocalCredentialStore over the same key-value store.
    pub credentials: Arc<dyn CredentialStore>,
    pub sessions: SessionRegistry,
    pub ids: Arc<IdSource>,
    pub exporter: Arc<ExportPipeline>,
}

impl AppState {
    /// Wires every service over one key-value store. Must run inside a tokio runtime.
    pub fn new(config: Config, store: Arc<dyn KeyValueStore>) -> Self {
        let ids = Arc::new(IdSource::new());
        let repository = ResumeRepository::new(store.clone());
        let writer = WriteBehind::spawn(repository.clone());
        let credentials = Arc::new(LocalCredentialStore::new(store, ids.clone()));
        let exporter = Arc::new(ExportPipeline::new(
            Arc::new(BitmapRasterizer),
            Arc::new(FsSink::new(config.export_dir.clone())),
            config.export_settle_delay,
            config.export_raster_scale,
        ));

        let sessions = SessionRegistry::new();
        sessions.spawn_idle_sweeper(config.session_idle_ttl);

        Self {
            repository,
            writer,
            credentials,
            sessions,
            ids,
            exporter,
        }
    }
}
