use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::session::ActiveSession;
use crate::errors::AppError;
use crate::models::resume::ResumeDocument;
use crate::models::user::User;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub token: Uuid,
    pub user: User,
    pub document: ResumeDocument,
}

/// POST /api/v1/auth/register
/// Registers and immediately logs in.
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let user = state
        .credentials
        .register(&req.name, &req.email, &req.password)
        .await?;
    start_session(&state, user).await.map(Json)
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let user = state.credentials.verify(&req.email, &req.password).await?;
    start_session(&state, user).await.map(Json)
}

/// POST /api/v1/auth/logout
/// Drops the session and its working document. The persisted copy remains.
pub async fn handle_logout(
    State(state): State<AppState>,
    session: ActiveSession,
) -> StatusCode {
    if let Some(context) = state.sessions.close(&session.token).await {
        let user_id = context.lock().await.user.id.clone();
        info!(user_id = %user_id, "Session closed");
    }
    StatusCode::NO_CONTENT
}

async fn start_session(state: &AppState, user: User) -> Result<SessionResponse, AppError> {
    // Pending snapshots from an earlier session must land before we read.
    state.writer.flush().await;
    let document = state.repository.load_or_default(&user).await?;
    let token = state.sessions.open(user.clone(), document.clone()).await;
    info!(user_id = %user.id, "Session opened");
    Ok(SessionResponse {
        token,
        user,
        document,
    })
}
