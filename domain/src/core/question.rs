//! Question value objects

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Minimum number of options on an objective-choice question
pub const MIN_OPTIONS: usize = 2;
/// Maximum number of options on an objective-choice question
pub const MAX_OPTIONS: usize = 6;

/// Stable identifier of a question within a paper
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(u64);

impl QuestionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for QuestionId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Kind of question, which decides how it is scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionKind {
    /// Fixed, literal-comparable answer (multiple choice)
    #[serde(rename = "multiple_choice", alias = "objective", alias = "choice")]
    ObjectiveChoice,
    /// Prose answer that needs qualitative judgment
    #[serde(rename = "short_answer", alias = "free_text", alias = "essay")]
    FreeText,
    /// Source code answer
    #[serde(rename = "programming", alias = "code")]
    Code,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::ObjectiveChoice => "multiple_choice",
            QuestionKind::FreeText => "short_answer",
            QuestionKind::Code => "programming",
        }
    }

    /// Objective items are scored by rule; the assessor is never trusted for them.
    pub fn is_objective(&self) -> bool {
        matches!(self, QuestionKind::ObjectiveChoice)
    }

    /// Learners may dispute any score that involved qualitative judgment.
    pub fn allows_dispute(&self) -> bool {
        !self.is_objective()
    }

    /// Points awarded when generated content does not state any
    pub fn default_points(&self) -> u32 {
        match self {
            QuestionKind::ObjectiveChoice => 5,
            QuestionKind::FreeText => 10,
            QuestionKind::Code => 20,
        }
    }
}

impl std::fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "multiple_choice" | "objective" | "choice" | "mcq" => Ok(QuestionKind::ObjectiveChoice),
            "short_answer" | "free_text" | "essay" | "saq" => Ok(QuestionKind::FreeText),
            "programming" | "code" => Ok(QuestionKind::Code),
            other => Err(format!("unknown question kind: {}", other)),
        }
    }
}

/// A published exam question (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    #[serde(alias = "type")]
    pub kind: QuestionKind,
    #[serde(alias = "question_text")]
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(alias = "answer", alias = "standard_answer")]
    pub reference_answer: String,
    #[serde(alias = "score")]
    pub max_score: u32,
}

impl Question {
    pub fn new(
        id: impl Into<QuestionId>,
        kind: QuestionKind,
        prompt: impl Into<String>,
        reference_answer: impl Into<String>,
        max_score: u32,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            prompt: prompt.into(),
            options: Vec::new(),
            reference_answer: reference_answer.into(),
            max_score,
        }
    }

    pub fn objective(
        id: impl Into<QuestionId>,
        prompt: impl Into<String>,
        reference_answer: impl Into<String>,
        max_score: u32,
    ) -> Self {
        Self::new(id, QuestionKind::ObjectiveChoice, prompt, reference_answer, max_score)
    }

    pub fn free_text(
        id: impl Into<QuestionId>,
        prompt: impl Into<String>,
        reference_answer: impl Into<String>,
        max_score: u32,
    ) -> Self {
        Self::new(id, QuestionKind::FreeText, prompt, reference_answer, max_score)
    }

    pub fn code(
        id: impl Into<QuestionId>,
        prompt: impl Into<String>,
        reference_answer: impl Into<String>,
        max_score: u32,
    ) -> Self {
        Self::new(id, QuestionKind::Code, prompt, reference_answer, max_score)
    }

    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.options.push(option.into());
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.extend(options.into_iter().map(Into::into));
        self
    }

    /// Check the structural invariants of a published question.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_score == 0 {
            return Err(DomainError::InvalidMaxScore(self.id));
        }
        if self.reference_answer.trim().is_empty() {
            return Err(DomainError::EmptyReferenceAnswer(self.id));
        }
        if self.kind.is_objective() {
            let count = self.options.len();
            if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&count) {
                return Err(DomainError::InvalidOptionCount { id: self.id, count });
            }
        } else if !self.options.is_empty() {
            return Err(DomainError::UnexpectedOptions(self.id));
        }
        Ok(())
    }
}

/// A validated set of questions with unique identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExamPaper {
    questions: Vec<Question>,
}

impl ExamPaper {
    /// Validate every question and reject duplicate identifiers.
    pub fn new(questions: Vec<Question>) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for question in &questions {
            question.validate()?;
            if !seen.insert(question.id) {
                return Err(DomainError::DuplicateQuestion(question.id));
            }
        }
        Ok(Self { questions })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn into_questions(self) -> Vec<Question> {
        self.questions
    }

    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Sum of all max scores
    pub fn max_total(&self) -> u64 {
        self.questions.iter().map(|q| u64::from(q.max_score)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mcq(id: u64) -> Question {
        Question::objective(id, "Pick one", "A", 5).with_options(["A. x", "B. y", "C. z"])
    }

    #[test]
    fn test_kind_wire_names() {
        let kind: QuestionKind = serde_json::from_str("\"multiple_choice\"").unwrap();
        assert_eq!(kind, QuestionKind::ObjectiveChoice);
        let kind: QuestionKind = serde_json::from_str("\"code\"").unwrap();
        assert_eq!(kind, QuestionKind::Code);
        assert_eq!(
            serde_json::to_string(&QuestionKind::FreeText).unwrap(),
            "\"short_answer\""
        );
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("MCQ".parse::<QuestionKind>(), Ok(QuestionKind::ObjectiveChoice));
        assert_eq!("essay".parse::<QuestionKind>(), Ok(QuestionKind::FreeText));
        assert!("poem".parse::<QuestionKind>().is_err());
    }

    #[test]
    fn test_allows_dispute() {
        assert!(!QuestionKind::ObjectiveChoice.allows_dispute());
        assert!(QuestionKind::FreeText.allows_dispute());
        assert!(QuestionKind::Code.allows_dispute());
    }

    #[test]
    fn test_validate_ok() {
        assert!(mcq(1).validate().is_ok());
        assert!(Question::free_text(2, "Explain", "Because", 10).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_questions() {
        assert_eq!(
            Question::free_text(1, "Explain", "Because", 0).validate(),
            Err(DomainError::InvalidMaxScore(QuestionId::new(1)))
        );
        assert_eq!(
            Question::objective(2, "Pick", "A", 5).with_option("A").validate(),
            Err(DomainError::InvalidOptionCount {
                id: QuestionId::new(2),
                count: 1
            })
        );
        assert_eq!(
            Question::code(3, "Write", "fn main() {}", 20)
                .with_option("A")
                .validate(),
            Err(DomainError::UnexpectedOptions(QuestionId::new(3)))
        );
        assert_eq!(
            Question::free_text(4, "Explain", "  ", 3).validate(),
            Err(DomainError::EmptyReferenceAnswer(QuestionId::new(4)))
        );
    }

    #[test]
    fn test_paper_rejects_duplicates() {
        let result = ExamPaper::new(vec![mcq(1), mcq(1)]);
        assert_eq!(result, Err(DomainError::DuplicateQuestion(QuestionId::new(1))));
    }

    #[test]
    fn test_paper_max_total() {
        let paper = ExamPaper::new(vec![
            mcq(1),
            Question::free_text(2, "Explain", "Because", 10),
        ])
        .unwrap();
        assert_eq!(paper.len(), 2);
        assert_eq!(paper.max_total(), 15);
        assert!(paper.get(QuestionId::new(2)).is_some());
    }

    #[test]
    fn test_paper_max_total_exceeds_u32() {
        let paper = ExamPaper::new(vec![
            Question::free_text(1, "Explain", "Because", 3_000_000_000),
            Question::free_text(2, "Explain again", "Because", 3_000_000_000),
        ])
        .unwrap();
        assert_eq!(paper.max_total(), 6_000_000_000);
    }

    #[test]
    fn test_question_deserialize_aliases() {
        let question: Question = serde_json::from_value(serde_json::json!({
            "id": 4,
            "kind": "short_answer",
            "question_text": "What is ownership?",
            "answer": "A set of rules",
            "score": 10
        }))
        .unwrap();
        assert_eq!(question.id, QuestionId::new(4));
        assert_eq!(question.prompt, "What is ownership?");
        assert_eq!(question.reference_answer, "A set of rules");
        assert_eq!(question.max_score, 10);
        assert!(question.options.is_empty());
    }
}
