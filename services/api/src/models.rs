//! API Models
//!
//! Request and response bodies, with `utoipa` schemas for the OpenAPI document.

use chrono::{DateTime, Utc};
use eco_detective_core::{
    classify::ClassificationOutcome,
    gate::{Attitude, GateUpdate, SessionContext, Visibility},
    quiz::{QuizOutcome, QuizQuestion},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityView {
    pub ai_message: bool,
    pub tools: bool,
    pub quiz: bool,
}

impl From<Visibility> for VisibilityView {
    fn from(v: Visibility) -> Self {
        Self {
            ai_message: v.ai_message,
            tools: v.tools,
            quiz: v.quiz,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct SessionView {
    #[schema(value_type = String, format = Uuid)]
    pub id: Uuid,
    #[schema(value_type = Option<String>, example = "good")]
    pub attitude: Option<Attitude>,
    pub ai_message: Option<String>,
    pub visibility: VisibilityView,
    pub created_at: DateTime<Utc>,
}

impl SessionView {
    pub fn new(ctx: &SessionContext, created_at: DateTime<Utc>) -> Self {
        Self {
            id: ctx.id,
            attitude: ctx.attitude,
            ai_message: ctx.ai_message.clone(),
            visibility: ctx.visibility.into(),
            created_at,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct ChoicePayload {
    #[schema(value_type = String, example = "good")]
    pub attitude: Attitude,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct GateUpdateView {
    pub ai_message: String,
    pub visibility: VisibilityView,
}

impl From<GateUpdate> for GateUpdateView {
    fn from(update: GateUpdate) -> Self {
        Self {
            ai_message: update.ai_message,
            visibility: update.visibility.into(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct VoiceAnswer {
    pub html: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct ClassificationView {
    pub label_html: String,
    pub explanation_html: String,
    /// URL of the spoken explanation, when one was produced.
    #[schema(example = "/audio/3f2c9a1e0b7d4e5f8a6b1c2d3e4f5a6b.mp3")]
    pub audio_url: Option<String>,
    #[schema(example = "paper")]
    pub tag: Option<String>,
    #[schema(example = "종이류")]
    pub label: Option<String>,
}

impl From<ClassificationOutcome> for ClassificationView {
    fn from(outcome: ClassificationOutcome) -> Self {
        let audio_url = outcome
            .audio_path
            .as_deref()
            .and_then(|p| p.file_name())
            .and_then(|name| name.to_str())
            .map(|name| format!("/audio/{}", name));
        let (tag, label) = match outcome.label {
            Some(label) => (Some(label.tag), Some(label.display)),
            None => (None, None),
        };
        Self {
            label_html: outcome.label_html,
            explanation_html: outcome.explanation_html,
            audio_url,
            tag,
            label,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct QuizQuestionView {
    #[schema(example = "종이컵은 종이로 분리수거해야 한다.")]
    pub question: String,
    pub choices: Vec<String>,
}

impl From<QuizQuestion> for QuizQuestionView {
    fn from(q: QuizQuestion) -> Self {
        Self {
            question: q.question,
            choices: q.choices,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct QuizPayload {
    #[schema(example = "❌")]
    pub choice: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct QuizOutcomeView {
    pub correct: bool,
    pub html: String,
    pub visible: bool,
}

impl From<QuizOutcome> for QuizOutcomeView {
    fn from(o: QuizOutcome) -> Self {
        Self {
            correct: o.correct,
            html: o.html,
            visible: o.visible,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}
