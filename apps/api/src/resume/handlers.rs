use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::auth::ActiveSession;
use crate::models::resume::{EducationPatch, ExperiencePatch, PersonalInfoPatch, ResumeDocument};
use crate::resume::mutations;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ValueBody {
    pub value: String,
}

/// Applies one mutation to the session's document, swaps in the new snapshot
/// and hands it to the write-behind queue. Returns the new document.
async fn apply(
    state: &AppState,
    session: &ActiveSession,
    mutate: impl FnOnce(&ResumeDocument) -> ResumeDocument,
) -> Json<ResumeDocument> {
    let mut context = session.context.lock().await;
    let next = mutate(&context.document);
    context.document = next.clone();
    state.writer.enqueue(&context.user.id, next.clone());
    Json(next)
}

/// GET /api/v1/resume
pub async fn handle_get_resume(session: ActiveSession) -> Json<ResumeDocument> {
    Json(session.context.lock().await.document.clone())
}

/// PATCH /api/v1/resume/personal
pub async fn handle_update_personal(
    State(state): State<AppState>,
    session: ActiveSession,
    Json(patch): Json<PersonalInfoPatch>,
) -> Json<ResumeDocument> {
    apply(&state, &session, |doc| mutations::update_personal_info(doc, patch)).await
}

// ────────────────────────────────────────────────────────────────────────────
// Experience
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/experiences
pub async fn handle_add_experience(
    State(state): State<AppState>,
    session: ActiveSession,
) -> Json<ResumeDocument> {
    let id = state.ids.next_id();
    apply(&state, &session, |doc| mutations::add_experience(doc, id)).await
}

/// PATCH /api/v1/resume/experiences/:id
pub async fn handle_update_experience(
    State(state): State<AppState>,
    session: ActiveSession,
    Path(id): Path<String>,
    Json(patch): Json<ExperiencePatch>,
) -> Json<ResumeDocument> {
    apply(&state, &session, |doc| mutations::update_experience(doc, &id, patch)).await
}

/// DELETE /api/v1/resume/experiences/:id
pub async fn handle_remove_experience(
    State(state): State<AppState>,
    session: ActiveSession,
    Path(id): Path<String>,
) -> Json<ResumeDocument> {
    apply(&state, &session, |doc| mutations::remove_experience(doc, &id)).await
}

/// POST /api/v1/resume/experiences/:id/bullets
pub async fn handle_add_bullet(
    State(state): State<AppState>,
    session: ActiveSession,
    Path(id): Path<String>,
) -> Json<ResumeDocument> {
    apply(&state, &session, |doc| mutations::add_experience_bullet(doc, &id)).await
}

/// PATCH /api/v1/resume/experiences/:id/bullets/:index
pub async fn handle_update_bullet(
    State(state): State<AppState>,
    session: ActiveSession,
    Path((id, index)): Path<(String, usize)>,
    Json(body): Json<ValueBody>,
) -> Json<ResumeDocument> {
    apply(&state, &session, |doc| {
        mutations::update_experience_bullet(doc, &id, index, body.value)
    })
    .await
}

/// DELETE /api/v1/resume/experiences/:id/bullets/:index
pub async fn handle_remove_bullet(
    State(state): State<AppState>,
    session: ActiveSession,
    Path((id, index)): Path<(String, usize)>,
) -> Json<ResumeDocument> {
    apply(&state, &session, |doc| {
        mutations::remove_experience_bullet(doc, &id, index)
    })
    .await
}

// ────────────────────────────────────────────────────────────────────────────
// Education
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/education
pub async fn handle_add_education(
    State(state): State<AppState>,
    session: ActiveSession,
) -> Json<ResumeDocument> {
    let id = state.ids.next_id();
    apply(&state, &session, |doc| mutations::add_education(doc, id)).await
}

/// PATCH /api/v1/resume/education/:id
pub async fn handle_update_education(
    State(state): State<AppState>,
    session: ActiveSession,
    Path(id): Path<String>,
    Json(patch): Json<EducationPatch>,
) -> Json<ResumeDocument> {
    apply(&state, &session, |doc| mutations::update_education(doc, &id, patch)).await
}

/// DELETE /api/v1/resume/education/:id
pub async fn handle_remove_education(
    State(state): State<AppState>,
    session: ActiveSession,
    Path(id): Path<String>,
) -> Json<ResumeDocument> {
    apply(&state, &session, |doc| mutations::remove_education(doc, &id)).await
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/skills
pub async fn handle_add_skill(
    State(state): State<AppState>,
    session: ActiveSession,
) -> Json<ResumeDocument> {
    let id = state.ids.next_id();
    apply(&state, &session, |doc| mutations::add_skill(doc, id)).await
}

/// PATCH /api/v1/resume/skills/:id
pub async fn handle_update_skill(
    State(state): State<AppState>,
    session: ActiveSession,
    Path(id): Path<String>,
    Json(body): Json<ValueBody>,
) -> Json<ResumeDocument> {
    apply(&state, &session, |doc| mutations::update_skill(doc, &id, body.value)).await
}

/// DELETE /api/v1/resume/skills/:id
pub async fn handle_remove_skill(
    State(state): State<AppState>,
    session: ActiveSession,
    Path(id): Path<String>,
) -> Json<ResumeDocument> {
    apply(&state, &session, |doc| mutations::remove_skill(doc, &id)).await
}
