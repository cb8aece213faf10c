//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the REST API, static assets, synthesized audio and the OpenAPI
//! documentation.

use crate::{
    handlers,
    models::{
        ChoicePayload, ClassificationView, ErrorResponse, GateUpdateView, QuizOutcomeView,
        QuizPayload, QuizQuestionView, SessionView, VisibilityView, VoiceAnswer,
    },
    state::AppState,
};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Photos from phone cameras routinely exceed axum's 2 MB default.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_session,
        handlers::get_session,
        handlers::choose,
        handlers::ask_by_voice,
        handlers::classify,
        handlers::get_quiz,
        handlers::answer_quiz,
    ),
    components(
        schemas(
            SessionView, VisibilityView, ChoicePayload, GateUpdateView, VoiceAnswer,
            ClassificationView, QuizQuestionView, QuizPayload, QuizOutcomeView, ErrorResponse
        )
    ),
    tags(
        (name = "Eco Detective API", description = "Recycling helper for children: photo classification, voice Q&A and a mini quiz")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let static_dir = app_state.config.static_dir.clone();
    let audio_dir = app_state.config.audio_dir();

    // Group all routes that require AppState into their own router.
    let api_router = Router::new()
        .route("/sessions", post(handlers::create_session))
        .route("/sessions/{id}", get(handlers::get_session))
        .route("/sessions/{id}/choice", post(handlers::choose))
        .route("/voice", post(handlers::ask_by_voice))
        .route("/classify", post(handlers::classify))
        .route("/quiz", get(handlers::get_quiz).post(handlers::answer_quiz))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest_service("/static", ServeDir::new(static_dir))
        .nest_service("/audio", ServeDir::new(audio_dir))
        .merge(api_router)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/sessions",
            "/sessions/{id}",
            "/sessions/{id}/choice",
            "/voice",
            "/classify",
            "/quiz",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
