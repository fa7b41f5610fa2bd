//! Domain layer for gradewise
//!
//! This crate contains the core grading and extraction logic. It performs
//! no I/O and has no async runtime; every function is pure over its inputs.
//!
//! # Core Concepts
//!
//! ## Tiered extraction
//!
//! Model output cannot be trusted to follow any format. The
//! [`TieredExtractor`] runs an ordered chain of strategies (direct parse,
//! bracketed region, sanitized region, shape coercion, text mining) and the
//! [`synthesizer`](extraction::synthesizer) supplies a schema-valid default
//! when every tier fails.
//!
//! ## Grading
//!
//! - **Precheck**: literal comparison of every answer against its reference
//! - **Reconcile**: match extracted records to questions by id, all or nothing
//! - **Scoring policy**: objective items are scored by rule only; free-text
//!   and code items are clamped into `[0, max_score]`

pub mod core;
pub mod extraction;
pub mod generation;
pub mod grading;
pub mod prompt;

// Re-export commonly used types
pub use core::{
    error::DomainError,
    model::Model,
    question::{ExamPaper, Question, QuestionId, QuestionKind},
};
pub use extraction::{
    DefaultTextMiner, Extraction, ExtractionAttempt, ExtractionDomain, ExtractionFailure,
    ExtractionOutcome, ExtractionRequest, FallbackContext, Schema, TextMiner, Tier,
    TieredExtractor, extract, extract_or_default, is_valid, synthesize,
};
pub use generation::{
    ExamBlueprint, GeneratedExam, GeneratedExamQuestion, GeneratedQuestion, KnowledgeGraph,
    KnowledgeNode,
};
pub use grading::{
    AssessmentItem, FallbackReason, GradeSummary, GradingOutcome, GradingResult, GradingState,
    Reconciliation, ScoreSource, SubmissionAnswer, precheck_all, resolve,
};
pub use prompt::PromptTemplate;
