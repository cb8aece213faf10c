//! Prompt Templates
//!
//! Prompts live as Markdown files in a directory, keyed by file stem. The
//! built-in defaults are what the service ships with in `prompts/`.

use anyhow::{Context, Result};
use std::{collections::HashMap, fs, path::Path};

pub const VOICE_PERSONA_KEY: &str = "voice_persona";
pub const EXPLAIN_SYSTEM_KEY: &str = "explain_system";
pub const EXPLAIN_ITEM_KEY: &str = "explain_item";

/// Placeholder replaced by the item's display name in the explain prompt.
pub const LABEL_PLACEHOLDER: &str = "{label}";

const DEFAULT_VOICE_PERSONA: &str = "친절한 분리수거 안내 도우미입니다. 어린이들을 대상으로 알려주는 거니까 이모티콘 많이 섞어서 답변해주세요.";
const DEFAULT_EXPLAIN_SYSTEM: &str = "친절한 분리수거 안내 도우미입니다.";
const DEFAULT_EXPLAIN_ITEM: &str = "'{label}'는 어떤 재활용 품목인가요? 어떻게 분리배출해야 하나요? 어린이를 위한 거니까 이모티콘 많이 섞어서, 친절하게 설명해줘.";

/// The fixed prompts sent with every language-model request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompts {
    /// System message for spoken questions.
    pub voice_persona: String,
    /// System message for item explanations.
    pub explain_system: String,
    /// User message template for item explanations.
    pub explain_item: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            voice_persona: DEFAULT_VOICE_PERSONA.to_string(),
            explain_system: DEFAULT_EXPLAIN_SYSTEM.to_string(),
            explain_item: DEFAULT_EXPLAIN_ITEM.to_string(),
        }
    }
}

impl Prompts {
    /// Builds the prompt set from a map of templates. Every key is required.
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self> {
        let get = |key: &str| -> Result<String> {
            map.get(key)
                .map(|s| s.trim().to_string())
                .with_context(|| format!("Missing prompt template: '{}'", key))
        };
        let explain_item = get(EXPLAIN_ITEM_KEY)?;
        if !explain_item.contains(LABEL_PLACEHOLDER) {
            anyhow::bail!(
                "Prompt template '{}' must contain the {} placeholder",
                EXPLAIN_ITEM_KEY,
                LABEL_PLACEHOLDER
            );
        }
        Ok(Self {
            voice_persona: get(VOICE_PERSONA_KEY)?,
            explain_system: get(EXPLAIN_SYSTEM_KEY)?,
            explain_item,
        })
    }

    /// Loads every `*.md` file in `dir` and builds the prompt set from them.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut prompts = HashMap::new();
        for entry in fs::read_dir(dir)
            .with_context(|| format!("Could not read prompts directory {}", dir.display()))?
        {
            let path = entry?.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("md") {
                let key = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .context("Could not get file stem")?
                    .to_string();
                prompts.insert(key, fs::read_to_string(&path)?);
            }
        }
        Self::from_map(&prompts)
    }

    /// The explanation request for an item with the given display name.
    pub fn explain_prompt(&self, label: &str) -> String {
        self.explain_item.replace(LABEL_PLACEHOLDER, label)
    }
}
