//! Image Classification
//!
//! Classifies a photographed item, asks the language model how to dispose of
//! it, and reads the answer aloud.

use anyhow::Result;
use image::{DynamicImage, ImageFormat};
use serde::Serialize;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    labels::ClassificationLabel,
    llm_client::ChatClient,
    prompts::Prompts,
    templates,
    tts::{self, SpeechSynthesizer},
    vision::{ClassifyError, ImageClassifier},
};

/// The three outputs shown by the photo tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationOutcome {
    pub label_html: String,
    pub explanation_html: String,
    pub audio_path: Option<PathBuf>,
    /// The detected item, when there was one.
    pub label: Option<ClassificationLabel>,
}

impl ClassificationOutcome {
    fn failure(message: &str) -> Self {
        Self {
            label_html: message.to_string(),
            explanation_html: String::new(),
            audio_path: None,
            label: None,
        }
    }
}

pub struct ImageClassificationAdapter {
    classifier: Arc<dyn ImageClassifier>,
    chat: Arc<dyn ChatClient>,
    tts: Arc<dyn SpeechSynthesizer>,
    prompts: Arc<Prompts>,
    /// Scratch space for the serialized upload.
    work_dir: PathBuf,
    /// Where synthesized explanations are written.
    audio_dir: PathBuf,
}

impl ImageClassificationAdapter {
    pub fn new(
        classifier: Arc<dyn ImageClassifier>,
        chat: Arc<dyn ChatClient>,
        tts: Arc<dyn SpeechSynthesizer>,
        prompts: Arc<Prompts>,
        work_dir: PathBuf,
        audio_dir: PathBuf,
    ) -> Self {
        Self {
            classifier,
            chat,
            tts,
            prompts,
            work_dir,
            audio_dir,
        }
    }

    #[instrument(name = "classify", skip_all, fields(width = image.width(), height = image.height()))]
    pub async fn classify_and_explain(&self, image: DynamicImage) -> Result<ClassificationOutcome> {
        let bytes = serialize_image(image, &self.work_dir).await?;

        let predictions = match self.classifier.classify(bytes).await {
            Ok(predictions) => predictions,
            Err(ClassifyError::Malformed(reason)) => {
                warn!(%reason, "Classification response could not be read");
                return Ok(ClassificationOutcome::failure(templates::IMAGE_ANALYSIS_ERROR));
            }
            Err(err @ ClassifyError::Transport(_)) => return Err(err.into()),
        };

        let Some(top) = predictions.first() else {
            info!("Classifier found nothing in the image");
            return Ok(ClassificationOutcome::failure(templates::IMAGE_NOT_RECOGNIZED));
        };

        let label = ClassificationLabel::from_tag(top.tag_name.clone());
        if !label.is_known() {
            warn!(tag = %label.tag, "Classifier returned a tag outside the known vocabulary");
        }
        info!(tag = %label.tag, display = %label.display, probability = top.probability, "Item classified");

        let explanation = self
            .chat
            .complete(
                &self.prompts.explain_system,
                &self.prompts.explain_prompt(&label.display),
            )
            .await?;

        let mp3 = self.tts.synthesize(&explanation).await?;
        let audio_path = tts::write_audio_file(&self.audio_dir, &mp3).await?;

        Ok(ClassificationOutcome {
            label_html: templates::label_card(&label.display),
            explanation_html: templates::explanation_card(&explanation),
            audio_path: Some(audio_path),
            label: Some(label),
        })
    }
}

/// Writes `image` as a JPEG to a per-request file under `work_dir`, reads the
/// bytes back and removes the file.
async fn serialize_image(image: DynamicImage, work_dir: &Path) -> Result<Vec<u8>> {
    tokio::fs::create_dir_all(work_dir).await?;
    let path = work_dir.join(format!("upload-{}.jpg", Uuid::new_v4().simple()));

    let write_path = path.clone();
    tokio::task::spawn_blocking(move || {
        DynamicImage::ImageRgb8(image.to_rgb8()).save_with_format(&write_path, ImageFormat::Jpeg)
    })
    .await??;

    let bytes = tokio::fs::read(&path).await;
    if let Err(e) = tokio::fs::remove_file(&path).await {
        warn!(path = %path.display(), error = %e, "Failed to remove temporary image");
    }
    Ok(bytes?)
}
