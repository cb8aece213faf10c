//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds all shared,
//! clonable resources like the session store and the service adapters.

use crate::{config::Config, sessions::SessionStore};
use eco_detective_core::{classify::ImageClassificationAdapter, voice::VoiceQaAdapter};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub voice: Arc<VoiceQaAdapter>,
    pub classifier: Arc<ImageClassificationAdapter>,
    pub config: Arc<Config>,
}
