pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::export::handlers as export;
use crate::preview::handlers as preview;
use crate::resume::handlers as resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Mock authentication
        .route("/api/v1/auth/register", post(auth::handle_register))
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/logout", post(auth::handle_logout))
        // Mutation API
        .route("/api/v1/resume", get(resume::handle_get_resume))
        .route(
            "/api/v1/resume/personal",
            patch(resume::handle_update_personal),
        )
        .route(
            "/api/v1/resume/experiences",
            post(resume::handle_add_experience),
        )
        .route(
            "/api/v1/resume/experiences/:id",
            patch(resume::handle_update_experience).delete(resume::handle_remove_experience),
        )
        .route(
            "/api/v1/resume/experiences/:id/bullets",
            post(resume::handle_add_bullet),
        )
        .route(
            "/api/v1/resume/experiences/:id/bullets/:index",
            patch(resume::handle_update_bullet).delete(resume::handle_remove_bullet),
        )
        .route(
            "/api/v1/resume/education",
            post(resume::handle_add_education),
        )
        .route(
            "/api/v1/resume/education/:id",
            patch(resume::handle_update_education).delete(resume::handle_remove_education),
        )
        .route("/api/v1/resume/skills", post(resume::handle_add_skill))
        .route(
            "/api/v1/resume/skills/:id",
            patch(resume::handle_update_skill).delete(resume::handle_remove_skill),
        )
        // Render projection and export
        .route("/api/v1/resume/preview", get(preview::handle_preview))
        .route("/api/v1/resume/export", post(export::handle_export))
        .route(
            "/api/v1/resume/exports/:file_name",
            get(export::handle_download),
        )
        .with_state(state)
}
