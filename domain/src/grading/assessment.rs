//! Precheck - the rule-based pass that runs before any model is consulted.

use super::entities::SubmissionAnswer;
use super::scoring::answers_match;
use crate::core::question::{Question, QuestionId, QuestionKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One entry of the batch description sent to the qualitative assessor.
///
/// Carries everything needed to score the item without the original
/// question, so the synthesizer and reconciler work from it alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentItem {
    pub question_id: QuestionId,
    pub question_type: QuestionKind,
    pub question_text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    pub reference_answer: String,
    pub learner_answer: String,
    /// Literal-comparison verdict, computed for every kind
    pub was_correct: bool,
    pub max_score: u32,
}

impl AssessmentItem {
    /// Precheck a single question against the learner's answer (if any).
    pub fn precheck(question: &Question, answer: Option<&SubmissionAnswer>) -> Self {
        let learner_answer = answer.map(|a| a.answer.clone()).unwrap_or_default();
        Self {
            question_id: question.id,
            question_type: question.kind,
            question_text: question.prompt.clone(),
            options: question.options.clone(),
            reference_answer: question.reference_answer.clone(),
            was_correct: answers_match(&learner_answer, &question.reference_answer),
            learner_answer,
            max_score: question.max_score,
        }
    }

    pub fn is_objective(&self) -> bool {
        self.question_type.is_objective()
    }
}

/// Precheck every question of a paper, in question order.
///
/// Questions without an answer are checked against an empty answer. Answers
/// that reference no question are ignored; when an id is answered twice the
/// first answer wins.
pub fn precheck_all(questions: &[Question], answers: &[SubmissionAnswer]) -> Vec<AssessmentItem> {
    let mut by_question: HashMap<QuestionId, &SubmissionAnswer> = HashMap::new();
    for answer in answers {
        by_question.entry(answer.question_id).or_insert(answer);
    }

    questions
        .iter()
        .map(|q| AssessmentItem::precheck(q, by_question.get(&q.id).copied()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper() -> Vec<Question> {
        vec![
            Question::objective(1, "2 + 2 = ?", "B", 5).with_options(["A. 3", "B. 4"]),
            Question::free_text(2, "What is a borrow?", "A reference", 10),
        ]
    }

    #[test]
    fn test_precheck_all_in_question_order() {
        let answers = vec![
            SubmissionAnswer::new(2, "a reference"),
            SubmissionAnswer::new(1, " b "),
        ];
        let items = precheck_all(&paper(), &answers);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].question_id, QuestionId::new(1));
        assert!(items[0].was_correct);
        // was_correct is computed for free-text too
        assert!(items[1].was_correct);
    }

    #[test]
    fn test_missing_answer_is_blank() {
        let items = precheck_all(&paper(), &[]);
        assert_eq!(items[0].learner_answer, "");
        assert!(!items[0].was_correct);
    }

    #[test]
    fn test_unknown_and_duplicate_answers() {
        let answers = vec![
            SubmissionAnswer::new(9, "B"),
            SubmissionAnswer::new(1, "A"),
            SubmissionAnswer::new(1, "B"),
        ];
        let items = precheck_all(&paper(), &answers);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].learner_answer, "A");
        assert!(!items[0].was_correct);
    }

    #[test]
    fn test_item_serializes_options_only_when_present() {
        let items = precheck_all(&paper(), &[]);
        let objective = serde_json::to_value(&items[0]).unwrap();
        let free_text = serde_json::to_value(&items[1]).unwrap();
        assert_eq!(objective["question_type"], "multiple_choice");
        assert_eq!(objective["options"].as_array().unwrap().len(), 2);
        assert!(free_text.get("options").is_none());
    }
}
