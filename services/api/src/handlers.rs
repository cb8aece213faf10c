//! Axum Handlers for the REST API
//!
//! One handler per front-end event. It uses `utoipa` doc comments to generate
//! OpenAPI documentation.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use bytes::Bytes;
use eco_detective_core::quiz::{self, QuizQuestion};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    models::{
        ChoicePayload, ClassificationView, ErrorResponse, GateUpdateView, QuizOutcomeView,
        QuizPayload, QuizQuestionView, SessionView, VoiceAnswer,
    },
    state::AppState,
};

pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    InternalServerError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { message })).into_response()
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse { message })).into_response()
            }
            ApiError::InternalServerError(err) => {
                error!("Internal Server Error: {:?}", err);
                let message = "An internal server error occurred.".to_string();
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse { message }),
                )
                    .into_response()
            }
        }
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::InternalServerError(err.into())
    }
}

/// Pulls the bytes of the multipart field called `name`.
async fn read_field(mut multipart: Multipart, name: &str) -> Result<Bytes, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() == Some(name) {
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            if data.is_empty() {
                return Err(ApiError::BadRequest(format!(
                    "multipart field '{}' is empty",
                    name
                )));
            }
            return Ok(data);
        }
    }
    Err(ApiError::BadRequest(format!(
        "multipart field '{}' is required",
        name
    )))
}

/// Start a new session with every section hidden.
#[utoipa::path(
    post,
    path = "/sessions",
    responses(
        (status = 201, description = "Session created successfully", body = SessionView)
    )
)]
pub async fn create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.sessions.create_session().await;
    info!(session_id = %session.id, "Session created");
    (StatusCode::CREATED, Json(session))
}

/// Get a session's current gate state.
#[utoipa::path(
    get,
    path = "/sessions/{id}",
    responses(
        (status = 200, description = "Session details", body = SessionView),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let session = state
        .sessions
        .get_session(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Session with id '{}' not found", id)))?;
    Ok(Json(session))
}

/// Record the child's good/bad choice and reveal the tools and quiz.
#[utoipa::path(
    post,
    path = "/sessions/{id}/choice",
    request_body = ChoicePayload,
    responses(
        (status = 200, description = "Sections to show", body = GateUpdateView),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn choose(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChoicePayload>,
) -> Result<Json<GateUpdateView>, ApiError> {
    let update = state
        .sessions
        .choose(id, payload.attitude)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Session with id '{}' not found", id)))?;
    info!(session_id = %id, attitude = ?payload.attitude, "Gate choice recorded");
    Ok(Json(update.into()))
}

/// Answer a recorded spoken question.
#[utoipa::path(
    post,
    path = "/voice",
    request_body(content = String, content_type = "multipart/form-data", description = "WAV recording in the `audio` field"),
    responses(
        (status = 200, description = "The detective's answer", body = VoiceAnswer),
        (status = 400, description = "Missing recording", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn ask_by_voice(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<VoiceAnswer>, ApiError> {
    let audio = read_field(multipart, "audio").await?;

    let scratch = state.config.scratch_dir();
    tokio::fs::create_dir_all(&scratch).await?;
    let utterance = scratch.join(format!("utterance-{}.wav", Uuid::new_v4().simple()));
    tokio::fs::write(&utterance, &audio).await?;

    let result = state.voice.answer(&utterance).await;

    if let Err(e) = tokio::fs::remove_file(&utterance).await {
        warn!(path = %utterance.display(), error = %e, "Failed to remove utterance");
    }

    Ok(Json(VoiceAnswer { html: result? }))
}

/// Classify a photo, explain how to dispose of it and read the explanation aloud.
#[utoipa::path(
    post,
    path = "/classify",
    request_body(content = String, content_type = "multipart/form-data", description = "Photo in the `image` field"),
    responses(
        (status = 200, description = "Label, explanation and audio URL", body = ClassificationView),
        (status = 400, description = "Missing or undecodable image", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn classify(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ClassificationView>, ApiError> {
    let data = read_field(multipart, "image").await?;

    let image = tokio::task::spawn_blocking(move || image::load_from_memory(&data))
        .await?
        .map_err(|e| ApiError::BadRequest(format!("Could not decode image: {}", e)))?;

    let outcome = state.classifier.classify_and_explain(image).await?;
    Ok(Json(outcome.into()))
}

/// Get the quiz question and its two buttons.
#[utoipa::path(
    get,
    path = "/quiz",
    responses(
        (status = 200, description = "The quiz question", body = QuizQuestionView)
    )
)]
pub async fn get_quiz() -> Json<QuizQuestionView> {
    Json(QuizQuestion::default().into())
}

/// Grade a quiz button press.
#[utoipa::path(
    post,
    path = "/quiz",
    request_body = QuizPayload,
    responses(
        (status = 200, description = "Correct or wrong fragment", body = QuizOutcomeView)
    )
)]
pub async fn answer_quiz(Json(payload): Json<QuizPayload>) -> Json<QuizOutcomeView> {
    let outcome = quiz::evaluate(&payload.choice);
    info!(choice = %payload.choice, correct = outcome.correct, "Quiz answered");
    Json(outcome.into())
}
