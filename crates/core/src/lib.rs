//! Eco Detective Core
//!
//! Domain logic for the recycling helper: the label table, the quiz, the
//! intent gate, and the adapters that glue the hosted speech, vision and
//! language services together.

pub mod audio;
pub mod classify;
pub mod gate;
pub mod labels;
pub mod llm_client;
pub mod prompts;
pub mod quiz;
pub mod speech;
pub mod templates;
pub mod tts;
pub mod vision;
pub mod voice;
