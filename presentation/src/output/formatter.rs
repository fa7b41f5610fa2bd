//! Output formatter trait

use gradewise_application::{GradeReport, Generated};
use gradewise_domain::{GeneratedExam, GeneratedQuestion, KnowledgeGraph};

/// Trait for rendering grading reports and generated content
pub trait OutputFormatter {
    fn format_report(&self, report: &GradeReport) -> String;

    fn format_question(&self, generated: &Generated<GeneratedQuestion>) -> String;

    fn format_exam(&self, generated: &Generated<GeneratedExam>) -> String;

    fn format_graph(&self, generated: &Generated<KnowledgeGraph>) -> String;
}
