//! Generated content: practice questions, exam papers, knowledge graphs.
//!
//! Values come out of the extractor (or the synthesizer) as JSON and are
//! read into typed entities here.

pub mod exam;
pub mod graph;
pub mod question;

pub use exam::{ExamBlueprint, GeneratedExam, GeneratedExamQuestion};
pub use graph::{KnowledgeGraph, KnowledgeNode};
pub use question::GeneratedQuestion;
