//! Speech-to-Text Client
//!
//! Uses the Azure Speech short-audio REST endpoint, which takes a complete
//! WAV clip and answers with a single recognition result.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

/// Language code used for every transcription.
pub const RECOGNITION_LANGUAGE: &str = "ko-KR";

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    /// The service heard nothing it could turn into words.
    #[error("speech could not be recognized")]
    Unrecognized,
    /// The service could not be reached or failed to process the request.
    #[error("speech recognition service error: {0}")]
    Service(String),
}

impl From<reqwest::Error> for TranscriptionError {
    fn from(err: reqwest::Error) -> Self {
        Self::Service(err.to_string())
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribes a 16 kHz mono PCM WAV clip.
    async fn transcribe(&self, wav: Vec<u8>, language: &str) -> Result<String, TranscriptionError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RecognitionResponse {
    recognition_status: String,
    #[serde(default)]
    display_text: Option<String>,
}

/// Maps a recognition response body to a transcript.
pub fn parse_recognition(body: &[u8]) -> Result<String, TranscriptionError> {
    let response: RecognitionResponse = serde_json::from_slice(body)
        .map_err(|e| TranscriptionError::Service(format!("unreadable response: {}", e)))?;

    match response.recognition_status.as_str() {
        "Success" => match response.display_text {
            Some(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
            _ => Err(TranscriptionError::Unrecognized),
        },
        "NoMatch" | "InitialSilenceTimeout" | "BabbleTimeout" => {
            Err(TranscriptionError::Unrecognized)
        }
        other => Err(TranscriptionError::Service(format!(
            "recognition status {}",
            other
        ))),
    }
}

pub struct AzureSpeechClient {
    http: reqwest::Client,
    endpoint: String,
    key: String,
}

impl AzureSpeechClient {
    pub fn new(endpoint: String, key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            key,
        }
    }

    /// The short-audio conversation endpoint for a region.
    pub fn endpoint_for_region(region: &str) -> String {
        format!(
            "https://{}.stt.speech.microsoft.com/speech/recognition/conversation/cognitiveservices/v1",
            region
        )
    }
}

#[async_trait]
impl SpeechToText for AzureSpeechClient {
    async fn transcribe(&self, wav: Vec<u8>, language: &str) -> Result<String, TranscriptionError> {
        debug!(bytes = wav.len(), language, "Sending utterance to speech recognition");
        let resp = self
            .http
            .post(&self.endpoint)
            .query(&[("language", language), ("format", "simple")])
            .header("Ocp-Apim-Subscription-Key", &self.key)
            .header(
                reqwest::header::CONTENT_TYPE,
                "audio/wav; codecs=audio/pcm; samplerate=16000",
            )
            .body(wav)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, body = %body, "Speech recognition request rejected");
            return Err(TranscriptionError::Service(format!("HTTP {}", status)));
        }

        parse_recognition(&resp.bytes().await?)
    }
}
