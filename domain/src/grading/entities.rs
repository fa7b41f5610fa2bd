//! Grading entities - learner answers in, per-item results out.

use crate::core::question::QuestionId;
use serde::{Deserialize, Serialize};

/// A learner's raw answer to one question of a submitted paper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionAnswer {
    pub question_id: QuestionId,
    /// Raw answer text; empty means the learner gave no answer
    #[serde(default, alias = "student_answer")]
    pub answer: String,
}

impl SubmissionAnswer {
    pub fn new(question_id: impl Into<QuestionId>, answer: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            answer: answer.into(),
        }
    }

    /// Returns `true` if the learner left the question blank.
    pub fn is_blank(&self) -> bool {
        self.answer.trim().is_empty()
    }
}

/// Where an awarded score came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    /// Rule-based literal comparison (objective items)
    Rule,
    /// Qualitative assessment returned by the model
    Assessment,
    /// Deterministic default, because no usable assessment was available
    Synthesized,
}

impl ScoreSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreSource::Rule => "rule",
            ScoreSource::Assessment => "assessment",
            ScoreSource::Synthesized => "synthesized",
        }
    }
}

impl std::fmt::Display for ScoreSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Graded outcome for exactly one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradingResult {
    pub question_id: QuestionId,
    /// Awarded score, always within `0..=max_score`
    pub score: u32,
    pub feedback: String,
    pub knowledge_point: String,
    /// Learners may dispute non-objective scores
    pub allow_dispute: bool,
    /// Copied from the question for display
    pub max_score: u32,
    pub source: ScoreSource,
}

impl GradingResult {
    /// Returns `true` if the full score was awarded.
    pub fn is_full_marks(&self) -> bool {
        self.score == self.max_score
    }
}
