use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::ActiveSession;
use crate::errors::AppError;
use crate::export::sink::sanitize_file_name;
use crate::export::{ExportError, Surface};
use crate::preview::{project, PREVIEW_ROOT_ID};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub file_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<usize>,
}

pub fn default_file_name(user_name: &str) -> String {
    let name = user_name.trim();
    let name = if name.is_empty() { "document" } else { name };
    format!("resume_{name}.pdf")
}

/// POST /api/v1/resume/export
///
/// Failures are reported as `success: false` only; the pipeline has already
/// logged the cause. A concurrent export in the same session is a 409.
pub async fn handle_export(
    State(state): State<AppState>,
    session: ActiveSession,
    body: Option<Json<ExportRequest>>,
) -> Result<Json<ExportResponse>, AppError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();

    // Snapshot under the lock; the export itself runs without holding it.
    let (surface, guard, owner, fallback_name) = {
        let context = session.context.lock().await;
        (
            Surface::with_preview(project(&context.document)),
            context.export_guard.clone(),
            context.user.id.clone(),
            default_file_name(&context.user.name),
        )
    };
    let file_name = request
        .file_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(fallback_name);

    match state
        .exporter
        .export(&guard, &surface, PREVIEW_ROOT_ID, &owner, &file_name)
        .await
    {
        Ok(receipt) => Ok(Json(ExportResponse {
            success: true,
            file_name: Some(receipt.file_name),
            pages: Some(receipt.pages),
        })),
        Err(ExportError::Busy) => Err(AppError::Conflict(ExportError::Busy.to_string())),
        Err(_) => Ok(Json(ExportResponse {
            success: false,
            file_name: None,
            pages: None,
        })),
    }
}

/// GET /api/v1/resume/exports/:file_name
/// Streams back one of the caller's own exports as a download.
pub async fn handle_download(
    State(state): State<AppState>,
    session: ActiveSession,
    Path(file_name): Path<String>,
) -> Result<Response, AppError> {
    let owner = session.context.lock().await.user.id.clone();
    let file_name = sanitize_file_name(&file_name);

    let pdf = state
        .exporter
        .fetch(&owner, &file_name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no export named {file_name:?}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        pdf,
    )
        .into_response())
}
