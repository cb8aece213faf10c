//! Mini Quiz
//!
//! A single true/false question about paper cups. The evaluator is a pure
//! function over the pressed button's symbol.

use serde::{Deserialize, Serialize};

/// The "true" button.
pub const CHOICE_O: &str = "⭕";
/// The "false" button.
pub const CHOICE_X: &str = "❌";

/// Paper cups are coated and go in general waste, so the statement is false.
pub const CORRECT_ANSWER: &str = CHOICE_X;

pub const QUESTION: &str = "종이컵은 종이로 분리수거해야 한다.";

/// The question as presented to the front end.
#[derive(Debug, Clone, Serialize)]
pub struct QuizQuestion {
    pub question: String,
    pub choices: Vec<String>,
}

impl Default for QuizQuestion {
    fn default() -> Self {
        Self {
            question: QUESTION.to_string(),
            choices: vec![CHOICE_O.to_string(), CHOICE_X.to_string()],
        }
    }
}

/// The rendered result of one button press.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOutcome {
    pub correct: bool,
    pub html: String,
    pub visible: bool,
}

/// Grades `choice`. Anything other than [`CORRECT_ANSWER`] is wrong.
pub fn evaluate(choice: &str) -> QuizOutcome {
    let correct = choice == CORRECT_ANSWER;
    let html = if correct {
        crate::templates::quiz_correct()
    } else {
        crate::templates::quiz_wrong()
    };
    QuizOutcome {
        correct,
        html,
        visible: true,
    }
}
