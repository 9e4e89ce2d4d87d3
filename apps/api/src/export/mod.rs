//! PDF export: capture → raster → paginate → save.
//!
//! # Stages
//! `Idle → Capturing → Rastered → Paginating → Saved`, with `Failed` reachable
//! from every stage before `Saved`. Each stage is a suspension point:
//! the settle delay is a timer, rasterization and PDF assembly run inside
//! `tokio::task::spawn_blocking`, and the save is an async sink call.
//!
//! # Single flight
//! An `ExportGuard` admits one export at a time. A second call while one is in
//! flight is rejected with `ExportError::Busy` instead of running alongside.
//!
//! There are no retries and no cancellation; callers decide whether to try again.

pub mod capture;
pub mod guard;
pub mod handlers;
pub mod layout;
pub mod paginate;
pub mod raster;
pub mod sink;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub use capture::Surface;
pub use guard::ExportGuard;
pub use paginate::PageSize;
pub use raster::{BitmapRasterizer, Rasterizer};
pub use sink::{FileSink, FsSink, SinkError};

use paginate::{assemble_pdf, plan_pages};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no element mounted as {0:?}")]
    ElementNotFound(String),

    #[error("rasterization failed: {0}")]
    RasterFailure(String),

    #[error("PDF assembly failed: {0}")]
    PdfAssembly(String),

    #[error("saving the PDF failed: {0}")]
    SaveFailure(String),

    #[error("an export is already in progress")]
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExportStage {
    Idle,
    Capturing,
    Rastered,
    Paginating,
    Saved,
    Failed,
}

impl ExportStage {
    pub fn can_advance_to(self, next: ExportStage) -> bool {
        use ExportStage::*;
        match (self, next) {
            (Idle, Capturing) | (Capturing, Rastered) | (Rastered, Paginating) | (Paginating, Saved) => {
                true
            }
            (Saved | Failed, Failed) => false,
            (_, Failed) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
struct StageTrail {
    stages: Vec<ExportStage>,
}

impl StageTrail {
    fn new() -> Self {
        Self {
            stages: vec![ExportStage::Idle],
        }
    }

    fn current(&self) -> ExportStage {
        self.stages.last().copied().unwrap_or(ExportStage::Idle)
    }

    fn advance(&mut self, next: ExportStage) {
        let from = self.current();
        debug_assert!(from.can_advance_to(next), "illegal export transition {from:?} → {next:?}");
        debug!(?from, to = ?next, "export stage");
        self.stages.push(next);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportReceipt {
    pub path: PathBuf,
    pub file_name: String,
    pub pages: usize,
    pub bytes: usize,
    pub stages: Vec<ExportStage>,
}

pub struct ExportPipeline {
    rasterizer: Arc<dyn Rasterizer>,
    sink: Arc<dyn FileSink>,
    page: PageSize,
    /// Wait before capture so pending projection work settles. Best effort only.
    settle_delay: Duration,
    /// Raster pixels per layout pixel.
    scale: f32,
}

impl ExportPipeline {
    pub fn new(
        rasterizer: Arc<dyn Rasterizer>,
        sink: Arc<dyn FileSink>,
        settle_delay: Duration,
        scale: f32,
    ) -> Self {
        Self {
            rasterizer,
            sink,
            page: PageSize::A4,
            settle_delay,
            scale,
        }
    }

    /// Runs one export of the element mounted at `element_id`, saving the
    /// result as `file_name` among `owner`'s files.
    ///
    /// Every failure is logged here, once, before it is returned.
    pub async fn export(
        &self,
        guard: &ExportGuard,
        surface: &Surface,
        element_id: &str,
        owner: &str,
        file_name: &str,
    ) -> Result<ExportReceipt, ExportError> {
        let Some(_permit) = guard.try_acquire() else {
            warn!(element_id, "Export rejected: another export is in flight");
            return Err(ExportError::Busy);
        };

        let mut trail = StageTrail::new();
        match self.run(&mut trail, surface, element_id, owner, file_name).await {
            Ok(receipt) => {
                info!(
                    file = %receipt.path.display(),
                    pages = receipt.pages,
                    bytes = receipt.bytes,
                    "PDF exported"
                );
                Ok(receipt)
            }
            Err(e) => {
                trail.advance(ExportStage::Failed);
                error!(element_id, owner, file_name, "PDF export failed: {e}");
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        trail: &mut StageTrail,
        surface: &Surface,
        element_id: &str,
        owner: &str,
        file_name: &str,
    ) -> Result<ExportReceipt, ExportError> {
        // 1. Capture
        trail.advance(ExportStage::Capturing);
        let element = surface
            .find(element_id)
            .cloned()
            .ok_or_else(|| ExportError::ElementNotFound(element_id.to_string()))?;
        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        // 2. Raster
        let rasterizer = self.rasterizer.clone();
        let scale = self.scale;
        let image = tokio::task::spawn_blocking(move || rasterizer.rasterize(&element, scale))
            .await
            .map_err(|e| ExportError::RasterFailure(e.to_string()))?
            .map_err(|e| ExportError::RasterFailure(e.to_string()))?;
        trail.advance(ExportStage::Rastered);

        // 3. Paginate
        trail.advance(ExportStage::Paginating);
        let page = self.page;
        let (pages, pdf) = tokio::task::spawn_blocking(move || {
            let plan = plan_pages(image.width(), image.height(), page);
            assemble_pdf(&image, &plan).map(|pdf| (plan.page_count(), pdf))
        })
        .await
        .map_err(|e| ExportError::PdfAssembly(e.to_string()))?
        .map_err(|e| ExportError::PdfAssembly(e.to_string()))?;

        // 4. Save
        let bytes = pdf.len();
        let path = self
            .sink
            .save(owner, file_name, Bytes::from(pdf))
            .await
            .map_err(|e| ExportError::SaveFailure(e.to_string()))?;
        trail.advance(ExportStage::Saved);

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(ExportReceipt {
            path,
            file_name,
            pages,
            bytes,
            stages: trail.stages.clone(),
        })
    }

    /// A previously exported file of `owner`, if it exists.
    pub async fn fetch(&self, owner: &str, file_name: &str) -> Result<Option<Bytes>, SinkError> {
        self.sink.fetch(owner, file_name).await
    }
}
