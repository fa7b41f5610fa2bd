//! Grading state machine states.

use serde::{Deserialize, Serialize};

/// States of one grading run, in the only order they are ever visited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradingState {
    /// Rule-based correctness check for every answer
    Precheck,
    /// Single batched request to the qualitative assessor
    AssessRequested,
    /// Tiered extraction over the raw response
    Extracting,
    /// Per-item matching and scoring policy
    Reconciling,
    /// Ordered, complete results emitted
    Done,
}

impl GradingState {
    pub const ORDER: [GradingState; 5] = [
        GradingState::Precheck,
        GradingState::AssessRequested,
        GradingState::Extracting,
        GradingState::Reconciling,
        GradingState::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GradingState::Precheck => "precheck",
            GradingState::AssessRequested => "assess_requested",
            GradingState::Extracting => "extracting",
            GradingState::Reconciling => "reconciling",
            GradingState::Done => "done",
        }
    }

    /// The state that follows this one, `None` once done
    pub fn next(&self) -> Option<GradingState> {
        match self {
            GradingState::Precheck => Some(GradingState::AssessRequested),
            GradingState::AssessRequested => Some(GradingState::Extracting),
            GradingState::Extracting => Some(GradingState::Reconciling),
            GradingState::Reconciling => Some(GradingState::Done),
            GradingState::Done => None,
        }
    }
}

impl std::fmt::Display for GradingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
