//! Intent Gate
//!
//! The landing page asks which character the child agrees with. Either answer
//! reveals the tools and the quiz; the sections never hide again.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::templates;

/// The child's answer to "which friend do you pick?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attitude {
    /// "Recycling properly keeps the earth clean."
    Good,
    /// "Just throw everything away together."
    Bad,
}

/// Visibility of the sections below the gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visibility {
    pub ai_message: bool,
    pub tools: bool,
    pub quiz: bool,
}

/// What the front end applies after a choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateUpdate {
    pub ai_message: String,
    pub visibility: Visibility,
}

/// Per-session UI state.
#[derive(Debug, Clone, Serialize)]
pub struct SessionContext {
    pub id: Uuid,
    pub attitude: Option<Attitude>,
    pub ai_message: Option<String>,
    pub visibility: Visibility,
}

impl SessionContext {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            attitude: None,
            ai_message: None,
            visibility: Visibility::default(),
        }
    }

    /// Records `attitude` and reveals the downstream sections.
    ///
    /// A "bad" choice updates the message but leaves its visibility as it was.
    pub fn choose(&mut self, attitude: Attitude) -> GateUpdate {
        let message = match attitude {
            Attitude::Good => {
                self.visibility.ai_message = true;
                templates::GOOD_CHOICE_MESSAGE
            }
            Attitude::Bad => templates::BAD_CHOICE_MESSAGE,
        };
        self.visibility.tools = true;
        self.visibility.quiz = true;
        self.attitude = Some(attitude);
        self.ai_message = Some(message.to_string());

        GateUpdate {
            ai_message: message.to_string(),
            visibility: self.visibility,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_hidden() {
        let ctx = SessionContext::new(Uuid::new_v4());
        assert_eq!(ctx.visibility, Visibility::default());
        assert!(ctx.attitude.is_none());
        assert!(ctx.ai_message.is_none());
    }

    #[test]
    fn test_good_reveals_everything() {
        let mut ctx = SessionContext::new(Uuid::new_v4());
        let update = ctx.choose(Attitude::Good);

        assert_eq!(
            update.visibility,
            Visibility {
                ai_message: true,
                tools: true,
                quiz: true
            }
        );
        assert!(update.ai_message.contains("좋은 생각이야!"));
        assert_eq!(ctx.attitude, Some(Attitude::Good));
    }

    #[test]
    fn test_bad_keeps_message_hidden() {
        let mut ctx = SessionContext::new(Uuid::new_v4());
        let update = ctx.choose(Attitude::Bad);

        assert!(!update.visibility.ai_message);
        assert!(update.visibility.tools);
        assert!(update.visibility.quiz);
        assert!(update.ai_message.contains("그러면 안 돼!"));
    }

    #[test]
    fn test_transitions_are_one_way() {
        let mut ctx = SessionContext::new(Uuid::new_v4());
        ctx.choose(Attitude::Good);
        let update = ctx.choose(Attitude::Bad);

        // Once shown, the message stays shown even after a "bad" choice.
        assert!(update.visibility.ai_message);
        assert!(update.visibility.tools);
        assert!(update.visibility.quiz);
        assert_eq!(ctx.attitude, Some(Attitude::Bad));
    }

    #[test]
    fn test_attitude_serde() {
        assert_eq!(serde_json::to_string(&Attitude::Good).unwrap(), "\"good\"");
        let bad: Attitude = serde_json::from_str("\"bad\"").unwrap();
        assert_eq!(bad, Attitude::Bad);
        assert!(serde_json::from_str::<Attitude>("\"neutral\"").is_err());
    }
}
