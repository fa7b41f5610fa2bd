//! Exam grading domain
//!
//! Pure pieces of the grading pipeline. The only impure step, the batched
//! call to the qualitative assessor, lives in the application layer.
//!
//! ```text
//! Precheck ──▶ AssessRequested ──▶ Extracting ──▶ Reconciling ──▶ Done
//!    │                │  (transport error)              ▲
//!    │                └─────────────────────────────────┘
//!    └─ assessment::precheck_all           reconcile::resolve
//! ```

pub mod assessment;
pub mod entities;
pub mod reconcile;
pub mod scoring;
pub mod state;

pub use assessment::{AssessmentItem, precheck_all};
pub use entities::{GradingResult, ScoreSource, SubmissionAnswer};
pub use reconcile::{
    FallbackReason, GradingOutcome, Reconciliation, reconcile, resolve, synthesize_results,
};
pub use scoring::{
    GradeSummary, UNDETERMINED_KNOWLEDGE_POINT, answers_match, clamp_score,
    neutral_partial_credit, objective_score,
};
pub use state::GradingState;
