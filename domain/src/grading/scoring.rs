//! Scoring policy - the deterministic rules every awarded score goes through.
//!
//! | Kind | Score |
//! |------|-------|
//! | Objective choice | `max_score` or `0`, by literal comparison only |
//! | Free text / code | assessed score clamped into `[0, max_score]` |
//! | Free text / code, no assessment | [`neutral_partial_credit`] |

use super::entities::GradingResult;
use crate::core::text::normalize_answer;
use serde::{Deserialize, Serialize};

/// Knowledge-point label used when none could be determined
pub const UNDETERMINED_KNOWLEDGE_POINT: &str = "undetermined";

/// Literal comparison used for objective items and as a hint for all others.
///
/// Trimmed, case-insensitive equality. A blank learner answer never matches,
/// even against a blank reference: an empty reference is invalid
/// ([`Question::validate`](crate::core::question::Question::validate)), and an
/// unanswered objective item scores zero on any paper.
pub fn answers_match(learner_answer: &str, reference_answer: &str) -> bool {
    let learner = normalize_answer(learner_answer);
    !learner.is_empty() && learner == normalize_answer(reference_answer)
}

/// Binary objective score.
pub fn objective_score(was_correct: bool, max_score: u32) -> u32 {
    if was_correct { max_score } else { 0 }
}

/// Round an assessed score and clamp it into `[0, max_score]`.
///
/// Non-finite input is treated as zero.
pub fn clamp_score(raw: f64, max_score: u32) -> u32 {
    if !raw.is_finite() {
        return 0;
    }
    raw.round().clamp(0.0, f64::from(max_score)) as u32
}

/// Credit awarded to a free-text or code item that could not be assessed.
///
/// Half of the max score (integer division), at least 1, never above the max.
pub fn neutral_partial_credit(max_score: u32) -> u32 {
    (max_score / 2).max(1).min(max_score)
}

/// Aggregate over a result list, computable without re-grading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GradeSummary {
    pub total_score: u64,
    pub max_total: u64,
    pub item_count: usize,
}

impl GradeSummary {
    pub fn from_results(results: &[GradingResult]) -> Self {
        Self {
            total_score: results.iter().map(|r| u64::from(r.score)).sum(),
            max_total: results.iter().map(|r| u64::from(r.max_score)).sum(),
            item_count: results.len(),
        }
    }

    /// Percentage of the maximum achievable total (0.0 for an empty paper)
    pub fn percentage(&self) -> f64 {
        if self.max_total == 0 {
            0.0
        } else {
            self.total_score as f64 * 100.0 / self.max_total as f64
        }
    }
}
