//! Text-to-Speech Client
//!
//! Synthesizes Korean speech through the Google Translate TTS endpoint. The
//! endpoint only accepts short inputs, so text is split into parts of at most
//! [`MAX_PART_CHARS`] characters and the returned MP3 parts are concatenated.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

pub const MAX_PART_CHARS: usize = 100;
pub const DEFAULT_TTS_BASE_URL: &str = "https://translate.google.com";
pub const TTS_LANGUAGE: &str = "ko";

const SENTENCE_ENDINGS: &[char] = &['.', '?', '!', '。', '？', '！', '…', '\n', ';', ':', '，', '、'];

#[derive(Debug, thiserror::Error)]
pub enum TtsError {
    #[error("no text to speak")]
    EmptyText,
    #[error("speech synthesis request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("speech synthesis returned HTTP {status} for part {part}")]
    Status { status: u16, part: usize },
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Returns MP3 audio for `text`.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError>;
}

fn is_filler(c: char) -> bool {
    c.is_whitespace() || c.is_ascii_punctuation() || SENTENCE_ENDINGS.contains(&c)
}

/// Splits `text` at sentence endings, keeping each ending with its sentence.
fn sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        current.push(c);
        if SENTENCE_ENDINGS.contains(&c) {
            out.push(std::mem::take(&mut current));
        }
    }
    out.push(current);
    out.into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.chars().all(is_filler))
        .collect()
}

/// Breaks one over-long sentence on whitespace, then on characters.
fn split_long(sentence: &str, max_chars: usize) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    for word in sentence.split_whitespace() {
        let mut word = word.to_string();
        while word.chars().count() > max_chars {
            if !current.is_empty() {
                parts.push(std::mem::take(&mut current));
            }
            let head: String = word.chars().take(max_chars).collect();
            word = word.chars().skip(max_chars).collect();
            parts.push(head);
        }
        if word.is_empty() {
            continue;
        }
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars {
            parts.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// Splits `text` into ordered parts no longer than `max_chars`, packing
/// consecutive sentences together while they fit.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    for sentence in sentences(text) {
        for piece in split_long(&sentence, max_chars) {
            match parts.last_mut() {
                Some(last) if last.chars().count() + 1 + piece.chars().count() <= max_chars => {
                    last.push(' ');
                    last.push_str(&piece);
                }
                _ => parts.push(piece),
            }
        }
    }
    parts
}

/// Google Translate TTS, the service behind gTTS.
pub struct GoogleTranslateTts {
    http: reqwest::Client,
    base_url: String,
    language: String,
}

impl GoogleTranslateTts {
    pub fn new(base_url: &str, language: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            language: language.to_string(),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTranslateTts {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError> {
        let parts = split_text(text, MAX_PART_CHARS);
        if parts.is_empty() {
            return Err(TtsError::EmptyText);
        }

        let url = format!("{}/translate_tts", self.base_url);
        let total = parts.len().to_string();
        let mut audio = Vec::new();
        for (idx, part) in parts.iter().enumerate() {
            let idx_str = idx.to_string();
            let textlen = part.chars().count().to_string();
            let resp = self
                .http
                .get(&url)
                .query(&[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("tl", self.language.as_str()),
                    ("q", part.as_str()),
                    ("total", total.as_str()),
                    ("idx", idx_str.as_str()),
                    ("textlen", textlen.as_str()),
                ])
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                return Err(TtsError::Status {
                    status: status.as_u16(),
                    part: idx,
                });
            }
            audio.extend_from_slice(&resp.bytes().await?);
        }

        debug!(parts = parts.len(), bytes = audio.len(), "Speech synthesized");
        Ok(audio)
    }
}

/// Writes MP3 bytes to a uniquely named file in `dir` and returns its path.
pub async fn write_audio_file(dir: &Path, mp3: &[u8]) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format!("{}.mp3", Uuid::new_v4().simple()));
    tokio::fs::write(&path, mp3).await?;
    Ok(path)
}
