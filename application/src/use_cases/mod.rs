//! Use cases (application services)
//!
//! - [`grade_exam`] - the grading orchestrator
//! - [`generate_content`] - practice question, exam and knowledge graph generation

pub mod generate_content;
pub mod grade_exam;

#[cfg(test)]
pub(crate) mod testing;
