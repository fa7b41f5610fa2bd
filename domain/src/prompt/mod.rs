//! Prompt domain
//!
//! Prompt text is opaque to the rest of the engine; only the grading batch
//! carries a structured payload.

mod template;

pub use template::PromptTemplate;
