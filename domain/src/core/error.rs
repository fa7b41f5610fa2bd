//! Domain error types

use super::question::QuestionId;
use thiserror::Error;

/// Domain-level errors
///
/// These are raised only while constructing exam papers. Grading and
/// extraction never fail; they degrade to synthesized results instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Question {0}: max score must be positive")]
    InvalidMaxScore(QuestionId),

    #[error("Question {id}: objective questions need 2 to 6 options, got {count}")]
    InvalidOptionCount { id: QuestionId, count: usize },

    #[error("Question {0}: only objective questions may carry options")]
    UnexpectedOptions(QuestionId),

    #[error("Question {0}: reference answer is empty")]
    EmptyReferenceAnswer(QuestionId),

    #[error("Duplicate question id {0} in paper")]
    DuplicateQuestion(QuestionId),

    #[error("Answer references unknown question {0}")]
    UnknownQuestion(QuestionId),
}
