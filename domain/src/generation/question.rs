//! Generated practice question

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A practice question produced by the model, with its reference answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    #[serde(alias = "question")]
    pub question_text: String,
    #[serde(alias = "answer", alias = "reference_answer")]
    pub standard_answer: String,
}

impl GeneratedQuestion {
    pub fn new(question_text: impl Into<String>, standard_answer: impl Into<String>) -> Self {
        Self {
            question_text: question_text.into(),
            standard_answer: standard_answer.into(),
        }
    }

    /// Read from an extracted value; `None` when either field is blank.
    pub fn from_value(value: &Value) -> Option<Self> {
        let question_text = value.get("question_text")?.as_str()?.trim();
        let standard_answer = value.get("standard_answer")?.as_str()?.trim();
        if question_text.is_empty() || standard_answer.is_empty() {
            return None;
        }
        Some(Self::new(question_text, standard_answer))
    }
}
