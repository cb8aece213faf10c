//! Image Classification Client
//!
//! Talks to an Azure Custom Vision prediction endpoint. The service ranks
//! predictions by probability, highest first.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One ranked guess from the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(rename = "tagName")]
    pub tag_name: String,
    #[serde(default)]
    pub probability: f64,
}

#[derive(Deserialize)]
struct PredictionResponse {
    // Present-but-null means "nothing found"; an absent key is still an error.
    #[serde(deserialize_with = "Option::deserialize")]
    predictions: Option<Vec<Prediction>>,
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    /// The service answered, but not with a prediction list.
    #[error("malformed classification response: {0}")]
    Malformed(String),
    /// The request never got an answer.
    #[error("classification request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Anything that can turn raw image bytes into ranked predictions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    async fn classify(&self, image: Vec<u8>) -> Result<Vec<Prediction>, ClassifyError>;
}

/// Parses a prediction response body. A body without a `predictions` field
/// (error payloads included) is `Malformed`; `"predictions": null` is empty.
pub fn parse_predictions(body: &[u8]) -> Result<Vec<Prediction>, ClassifyError> {
    serde_json::from_slice::<PredictionResponse>(body)
        .map(|r| r.predictions.unwrap_or_default())
        .map_err(|e| ClassifyError::Malformed(e.to_string()))
}

pub struct CustomVisionClient {
    http: reqwest::Client,
    url: String,
    prediction_key: String,
}

impl CustomVisionClient {
    pub fn new(
        endpoint: &str,
        project_id: &str,
        iteration_name: &str,
        prediction_key: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: prediction_url(endpoint, project_id, iteration_name),
            prediction_key,
        }
    }
}

fn prediction_url(endpoint: &str, project_id: &str, iteration_name: &str) -> String {
    format!(
        "{}/customvision/v3.0/Prediction/{}/classify/iterations/{}/image",
        endpoint.trim_end_matches('/'),
        project_id,
        iteration_name
    )
}

#[async_trait]
impl ImageClassifier for CustomVisionClient {
    async fn classify(&self, image: Vec<u8>) -> Result<Vec<Prediction>, ClassifyError> {
        debug!(bytes = image.len(), "Sending image to Custom Vision");
        let resp = self
            .http
            .post(&self.url)
            .header("Prediction-Key", &self.prediction_key)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.bytes().await?;
        if !status.is_success() {
            warn!(%status, "Custom Vision returned an error status");
        }
        parse_predictions(&body)
    }
}
