//! Resilient extraction of structured values from model output
//!
//! ```text
//! raw text ──▶ TieredExtractor ──(value)──────────────────▶ caller
//!                 │  1 direct  2 region  3 sanitized
//!                 │  4 coercion  5 TextMiner
//!                 └─(none)──▶ synthesizer::synthesize ──▶ caller
//! ```
//!
//! Every tier validates against an [`ExtractionRequest`] (domain shape plus
//! a per-record [`Schema`]), so no partially-valid value ever escapes.

pub mod extractor;
pub mod miner;
pub mod sanitize;
pub mod scanner;
pub mod schema;
pub mod synthesizer;
pub mod target;

pub use extractor::{
    ExtractionAttempt, ExtractionFailure, ExtractionOutcome, Tier, TieredExtractor, coerce_shape,
    extract,
};
pub use miner::{DefaultTextMiner, TextMiner};
pub use sanitize::sanitize;
pub use scanner::{bracketed_regions, find_bracketed_region};
pub use schema::{FieldKind, FieldSpec, Schema, is_valid};
pub use synthesizer::{
    DefaultGrade, Extraction, FallbackContext, GRADING_TEMPLATES, default_grade,
    extract_or_default, synthesize,
};
pub use target::{ExtractionDomain, ExtractionRequest, Shape};
