//! Reconciliation - matching extracted records back to their questions.
//!
//! The reconciler is all-or-nothing: either every question is matched to
//! exactly one extracted record, or all extracted output is discarded and
//! every item is synthesized. Partial alignment is never attempted, since a
//! shifted record would silently attach feedback to the wrong question.

use super::assessment::AssessmentItem;
use super::entities::{GradingResult, ScoreSource};
use super::scoring::{UNDETERMINED_KNOWLEDGE_POINT, clamp_score, objective_score};
use crate::core::question::QuestionId;
use crate::extraction::schema::{integer_value, numeric_value};
use crate::extraction::synthesizer::default_grade;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Why a grading run fell back to synthesized results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// The assessor could not be reached, errored, or timed out
    Transport,
    /// Text came back but no extraction tier produced a valid result
    Structural,
    /// A valid array was produced with the wrong number of records
    CountMismatch,
    /// Record ids were duplicated or did not match the paper
    IdentifierMismatch,
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackReason::Transport => "transport",
            FallbackReason::Structural => "structural",
            FallbackReason::CountMismatch => "count_mismatch",
            FallbackReason::IdentifierMismatch => "identifier_mismatch",
        }
    }
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the results of a grading run were produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GradingOutcome {
    /// Every item was reconciled against the qualitative assessment
    Assessed,
    /// Every item was synthesized
    Synthesized { reason: FallbackReason },
}

impl GradingOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, GradingOutcome::Synthesized { .. })
    }
}

/// Final, ordered results of one grading run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub results: Vec<GradingResult>,
    pub outcome: GradingOutcome,
}

/// Match extracted records to prechecked items and apply the scoring policy.
///
/// `extracted` must be the array produced by the extractor. The returned
/// results are in item order; use [`resolve`] for the ordered final list.
pub fn reconcile(
    items: &[AssessmentItem],
    extracted: &Value,
) -> Result<Vec<GradingResult>, FallbackReason> {
    let records = extracted.as_array().ok_or(FallbackReason::Structural)?;
    if records.len() != items.len() {
        return Err(FallbackReason::CountMismatch);
    }

    let mut by_id: HashMap<QuestionId, &Value> = HashMap::with_capacity(records.len());
    for record in records {
        let id = record
            .get("question_id")
            .and_then(integer_value)
            .map(QuestionId::new)
            .ok_or(FallbackReason::Structural)?;
        if by_id.insert(id, record).is_some() {
            return Err(FallbackReason::IdentifierMismatch);
        }
    }

    let item_ids: HashSet<QuestionId> = items.iter().map(|i| i.question_id).collect();
    if item_ids.len() != items.len() || by_id.keys().any(|id| !item_ids.contains(id)) {
        return Err(FallbackReason::IdentifierMismatch);
    }

    items
        .iter()
        .map(|item| {
            let record = by_id
                .get(&item.question_id)
                .ok_or(FallbackReason::IdentifierMismatch)?;
            Ok(assessed_result(item, record))
        })
        .collect()
}

fn assessed_result(item: &AssessmentItem, record: &Value) -> GradingResult {
    let (score, source) = if item.is_objective() {
        (
            objective_score(item.was_correct, item.max_score),
            ScoreSource::Rule,
        )
    } else {
        let raw = record.get("score").and_then(numeric_value).unwrap_or(0.0);
        (clamp_score(raw, item.max_score), ScoreSource::Assessment)
    };

    let feedback = text_field(record, "feedback")
        .unwrap_or_else(|| default_grade(item).feedback.to_string());
    let knowledge_point = text_field(record, "knowledge_point")
        .unwrap_or_else(|| UNDETERMINED_KNOWLEDGE_POINT.to_string());

    GradingResult {
        question_id: item.question_id,
        score,
        feedback,
        knowledge_point,
        allow_dispute: item.question_type.allows_dispute(),
        max_score: item.max_score,
        source,
    }
}

fn text_field(record: &Value, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Deterministic default result for every item.
pub fn synthesize_results(items: &[AssessmentItem]) -> Vec<GradingResult> {
    items
        .iter()
        .map(|item| {
            let grade = default_grade(item);
            GradingResult {
                question_id: item.question_id,
                score: grade.score,
                feedback: grade.feedback.to_string(),
                knowledge_point: grade.knowledge_point.to_string(),
                allow_dispute: item.question_type.allows_dispute(),
                max_score: item.max_score,
                source: ScoreSource::Synthesized,
            }
        })
        .collect()
}

/// Resolve a grading run from whatever extraction produced.
///
/// Always returns one result per item, ordered by ascending question id.
pub fn resolve(
    items: &[AssessmentItem],
    extracted: Result<&Value, FallbackReason>,
) -> Reconciliation {
    let (mut results, outcome) = match extracted.and_then(|value| reconcile(items, value)) {
        Ok(results) => (results, GradingOutcome::Assessed),
        Err(reason) => (
            synthesize_results(items),
            GradingOutcome::Synthesized { reason },
        ),
    };
    results.sort_by_key(|r| r.question_id);
    Reconciliation { results, outcome }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::question::Question;
    use crate::grading::assessment::precheck_all;
    use crate::grading::entities::SubmissionAnswer;
    use serde_json::json;

    fn items() -> Vec<AssessmentItem> {
        let questions = vec![
            Question::free_text(2, "Explain borrowing", "References", 10),
            Question::objective(1, "Pick", "A", 5).with_options(["A", "B"]),
        ];
        let answers = vec![
            SubmissionAnswer::new(1, "a"),
            SubmissionAnswer::new(2, "Borrowing lends a reference"),
        ];
        precheck_all(&questions, &answers)
    }

    fn record(id: u64, score: f64) -> Value {
        json!({
            "question_id": id,
            "score": score,
            "feedback": format!("feedback {}", id),
            "knowledge_point": "ownership"
        })
    }

    #[test]
    fn test_reconcile_applies_policy() {
        // assessor claims 0 for the objective item and 42 for free text
        let extracted = json!([record(1, 0.0), record(2, 42.0)]);
        let resolved = resolve(&items(), Ok(&extracted));

        assert_eq!(resolved.outcome, GradingOutcome::Assessed);
        let first = &resolved.results[0];
        assert_eq!(first.question_id, QuestionId::new(1));
        assert_eq!(first.score, 5);
        assert_eq!(first.source, ScoreSource::Rule);
        assert!(!first.allow_dispute);
        assert_eq!(first.feedback, "feedback 1");

        let second = &resolved.results[1];
        assert_eq!(second.score, 10);
        assert_eq!(second.source, ScoreSource::Assessment);
        assert!(second.allow_dispute);
        assert_eq!(second.knowledge_point, "ownership");
    }

    #[test]
    fn test_results_ordered_by_id() {
        let extracted = json!([record(2, 3.0), record(1, 5.0)]);
        let resolved = resolve(&items(), Ok(&extracted));
        let ids: Vec<u64> = resolved.results.iter().map(|r| r.question_id.value()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_count_mismatch_discards_everything() {
        let extracted = json!([record(1, 5.0), record(2, 7.0), record(3, 1.0)]);
        let resolved = resolve(&items(), Ok(&extracted));
        assert_eq!(
            resolved.outcome,
            GradingOutcome::Synthesized {
                reason: FallbackReason::CountMismatch
            }
        );
        assert!(resolved.results.iter().all(|r| r.source == ScoreSource::Synthesized));
        assert_eq!(resolved.results[1].score, 5);
    }

    #[test]
    fn test_unknown_or_duplicate_ids_are_rejected() {
        let unknown = json!([record(1, 5.0), record(7, 5.0)]);
        assert_eq!(
            reconcile(&items(), &unknown),
            Err(FallbackReason::IdentifierMismatch)
        );
        let duplicate = json!([record(1, 5.0), record(1, 5.0)]);
        assert_eq!(
            reconcile(&items(), &duplicate),
            Err(FallbackReason::IdentifierMismatch)
        );
    }

    #[test]
    fn test_numeric_string_ids_are_accepted() {
        let extracted = json!([
            {"question_id": "1", "score": "4", "feedback": "ok", "knowledge_point": "k"},
            {"question_id": 2.0, "score": "6.4", "feedback": "ok", "knowledge_point": "k"}
        ]);
        let results = reconcile(&items(), &extracted).unwrap();
        assert_eq!(results[1].score, 6);
    }

    #[test]
    fn test_transport_failure_synthesizes() {
        let resolved = resolve(&items(), Err(FallbackReason::Transport));
        assert!(resolved.outcome.is_degraded());
        assert_eq!(resolved.results.len(), 2);
        // objective item scored by precheck, free text at neutral credit
        assert_eq!(resolved.results[0].score, 5);
        assert_eq!(resolved.results[1].score, 5);
        assert!(resolved.results[1].feedback.contains("unavailable"));
    }

    #[test]
    fn test_non_array_is_structural() {
        assert_eq!(
            reconcile(&items(), &json!({"question_id": 1})),
            Err(FallbackReason::Structural)
        );
    }
}
