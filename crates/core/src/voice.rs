//! Voice Q&A
//!
//! Turns a recorded question into the detective's answer: speech-to-text,
//! then one chat completion with the voice persona.

use anyhow::Result;
use std::{path::Path, sync::Arc};
use tracing::{info, instrument, warn};

use crate::{
    audio,
    llm_client::ChatClient,
    prompts::Prompts,
    speech::{RECOGNITION_LANGUAGE, SpeechToText, TranscriptionError},
    templates,
};

pub struct VoiceQaAdapter {
    stt: Arc<dyn SpeechToText>,
    chat: Arc<dyn ChatClient>,
    prompts: Arc<Prompts>,
}

impl VoiceQaAdapter {
    pub fn new(stt: Arc<dyn SpeechToText>, chat: Arc<dyn ChatClient>, prompts: Arc<Prompts>) -> Self {
        Self { stt, chat, prompts }
    }

    /// Answers the question recorded at `utterance`.
    ///
    /// Recognition failures become a friendly message; any other failure is
    /// returned as an error.
    #[instrument(name = "voice_qa", skip_all, fields(utterance = %utterance.display()))]
    pub async fn answer(&self, utterance: &Path) -> Result<String> {
        let wav = audio::prepare_for_recognition_blocking(utterance.to_path_buf()).await?;

        let question = match self.stt.transcribe(wav, RECOGNITION_LANGUAGE).await {
            Ok(text) => text,
            Err(TranscriptionError::Unrecognized) => {
                info!("Speech was not recognized");
                return Ok(templates::SPEECH_NOT_RECOGNIZED.to_string());
            }
            Err(TranscriptionError::Service(reason)) => {
                warn!(%reason, "Speech recognition failed");
                return Ok(templates::SPEECH_SERVICE_ERROR.to_string());
            }
        };
        info!(%question, "Question transcribed");

        let answer = self
            .chat
            .complete(&self.prompts.voice_persona, &question)
            .await?;
        Ok(templates::voice_answer(&answer))
    }
}
