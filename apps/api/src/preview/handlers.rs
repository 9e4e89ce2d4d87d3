use axum::Json;

use crate::auth::ActiveSession;
use crate::preview::{project, VisualDocument};

/// GET /api/v1/resume/preview
pub async fn handle_preview(session: ActiveSession) -> Json<VisualDocument> {
    let context = session.context.lock().await;
    Json(project(&context.document))
}
