//! Console and JSON formatters for gradewise output

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use gradewise_application::{GradeReport, Generated};
use gradewise_domain::{
    GeneratedExam, GeneratedQuestion, GradingOutcome, GradingResult, KnowledgeGraph,
    KnowledgeNode, ScoreSource,
};
use serde::Serialize;

/// Enable or disable ANSI colors for everything this module prints
pub fn set_color(enabled: bool) {
    colored::control::set_override(enabled);
}

/// Formats reports and generated content for terminal display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    pub fn format_report(report: &GradeReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Grading Report"));
        output.push('\n');

        output.push_str(&format!(
            "{:>4}  {:>9}  {:<11}  {:<24}  {}\n",
            "Q", "Score", "Source", "Knowledge point", "Feedback"
        ));
        output.push_str(&format!("{}\n", "-".repeat(72)));

        for result in &report.results {
            output.push_str(&Self::result_row(result));
        }

        let summary = &report.summary;
        output.push_str(&format!(
            "\n{} {}/{} ({:.1}%) over {} questions\n",
            "Total:".cyan().bold(),
            summary.total_score,
            summary.max_total,
            summary.percentage(),
            summary.item_count
        ));

        match report.outcome {
            GradingOutcome::Assessed => {
                let tier = report
                    .extraction_tier
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "none".to_string());
                output.push_str(&format!(
                    "{} assessed (extraction tier: {})\n",
                    "Status:".cyan().bold(),
                    tier
                ));
            }
            GradingOutcome::Synthesized { reason } => {
                output.push_str(&format!(
                    "{} {} ({})\n",
                    "Status:".cyan().bold(),
                    "degraded, default scores assigned".yellow().bold(),
                    reason
                ));
                output.push_str(&format!(
                    "{}\n",
                    "Free-text and code answers need human review.".yellow()
                ));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    fn result_row(result: &GradingResult) -> String {
        let score = format!("{:>4}/{:<4}", result.score, result.max_score);
        let score = if result.is_full_marks() {
            score.green()
        } else if result.score == 0 {
            score.red()
        } else {
            score.yellow()
        };
        let source = match result.source {
            ScoreSource::Rule => result.source.as_str().normal(),
            ScoreSource::Assessment => result.source.as_str().cyan(),
            ScoreSource::Synthesized => result.source.as_str().yellow(),
        };
        format!(
            "{:>4}  {}  {:<11}  {:<24}  {}\n",
            result.question_id,
            score,
            source,
            truncate(&result.knowledge_point, 24),
            result.feedback
        )
    }

    pub fn format_question(generated: &Generated<GeneratedQuestion>) -> String {
        let question = &generated.content;
        let mut output = String::new();
        output.push_str(&Self::header("Practice Question"));
        output.push_str(&format!(
            "\n{}\n{}\n\n{}\n{}\n",
            "Question:".cyan().bold(),
            question.question_text,
            "Reference answer:".cyan().bold(),
            question.standard_answer
        ));
        output.push_str(&Self::provenance(generated));
        output.push_str(&Self::footer());
        output
    }

    pub fn format_exam(generated: &Generated<GeneratedExam>) -> String {
        let exam = &generated.content;
        let mut output = String::new();
        output.push_str(&Self::header(&exam.title));
        output.push('\n');

        for (n, question) in exam.questions.iter().enumerate() {
            output.push_str(&format!(
                "\n{} {} ({} points)\n",
                format!("{}.", n + 1).bold(),
                format!("[{}]", question.kind.as_str()).dimmed(),
                question.points_or_default()
            ));
            output.push_str(&Self::indent(&question.question_text, "   "));
            output.push('\n');
            for option in &question.options {
                output.push_str(&format!("     {}\n", option));
            }
            output.push_str(&format!("   {} {}\n", "Answer:".green(), question.answer));
        }

        output.push_str(&Self::provenance(generated));
        output.push_str(&Self::footer());
        output
    }

    pub fn format_graph(generated: &Generated<KnowledgeGraph>) -> String {
        let graph = &generated.content;
        let mut output = String::new();
        output.push_str(&Self::header("Knowledge Graph"));
        output.push('\n');
        output.push_str(&format!("{}\n", graph.topic().bold()));
        Self::push_children(&mut output, &graph.root, "");
        output.push_str(&format!(
            "\n{} {} nodes, depth {}\n",
            "Size:".dimmed(),
            graph.node_count(),
            graph.depth()
        ));
        output.push_str(&Self::provenance(generated));
        output.push_str(&Self::footer());
        output
    }

    fn push_children(output: &mut String, node: &KnowledgeNode, prefix: &str) {
        let last = node.children.len().saturating_sub(1);
        for (i, child) in node.children.iter().enumerate() {
            let (branch, next) = if i == last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };
            output.push_str(&format!("{}{}{}\n", prefix, branch, child.name));
            Self::push_children(output, child, &format!("{}{}", prefix, next));
        }
    }

    fn provenance<T>(generated: &Generated<T>) -> String {
        if generated.synthesized {
            format!(
                "\n{}\n",
                "Placeholder content: the model reply was unusable. Review before use."
                    .yellow()
                    .bold()
            )
        } else {
            let tier = generated
                .tier
                .map(|t| t.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            format!("\n{} {}\n", "Extracted via:".dimmed(), tier)
        }
    }

    /// Pretty JSON for any serializable value
    pub fn format_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &GradeReport) -> String {
        Self::format_report(report)
    }

    fn format_question(&self, generated: &Generated<GeneratedQuestion>) -> String {
        Self::format_question(generated)
    }

    fn format_exam(&self, generated: &Generated<GeneratedExam>) -> String {
        Self::format_exam(generated)
    }

    fn format_graph(&self, generated: &Generated<KnowledgeGraph>) -> String {
        Self::format_graph(generated)
    }
}

/// Formats everything as pretty JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &GradeReport) -> String {
        ConsoleFormatter::format_json(report)
    }

    fn format_question(&self, generated: &Generated<GeneratedQuestion>) -> String {
        ConsoleFormatter::format_json(generated)
    }

    fn format_exam(&self, generated: &Generated<GeneratedExam>) -> String {
        ConsoleFormatter::format_json(generated)
    }

    fn format_graph(&self, generated: &Generated<KnowledgeGraph>) -> String {
        ConsoleFormatter::format_json(generated)
    }
}
