//! Default Synthesizer - deterministic placeholders when extraction fails.
//!
//! Every function here is total. Templates are plain data tables keyed by
//! domain and filled from an explicit [`FallbackContext`].

use super::extractor::{ExtractionOutcome, TieredExtractor};
use super::target::{ExtractionDomain, ExtractionRequest};
use crate::core::question::QuestionKind;
use crate::grading::assessment::AssessmentItem;
use crate::grading::scoring::{
    UNDETERMINED_KNOWLEDGE_POINT, neutral_partial_credit, objective_score,
};
use serde_json::{Value, json};
use tracing::debug;

/// Feedback lines used for synthesized grading results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradingTemplates {
    pub correct: &'static str,
    pub incorrect: &'static str,
    pub unavailable: &'static str,
}

pub const GRADING_TEMPLATES: GradingTemplates = GradingTemplates {
    correct: "Correct.",
    incorrect: "Incorrect, see the reference answer.",
    unavailable: "Automated assessment was unavailable for this answer; \
                  a provisional score was given and human review is recommended.",
};

/// Branches and leaves of the placeholder knowledge graph
pub const GRAPH_BRANCHES: [(&str, [&str; 3]); 3] = [
    ("Basic concepts", ["Definition", "Characteristics", "Classification"]),
    ("Core principles", ["Mechanism", "Process", "Key techniques"]),
    ("Applications", ["Use cases", "Case studies", "Trends"]),
];

pub const PLACEHOLDER_OPTIONS: [&str; 4] = [
    "A. Statement 1",
    "B. Statement 2",
    "C. Statement 3",
    "D. Statement 4",
];

/// Synthesized grade for a single item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultGrade {
    pub score: u32,
    pub feedback: &'static str,
    pub knowledge_point: &'static str,
}

/// Deterministic grade for `item` without any qualitative assessment.
///
/// Objective items keep their rule score. Free-text and code items get the
/// neutral partial credit and are flagged for human review.
pub fn default_grade(item: &AssessmentItem) -> DefaultGrade {
    let (score, feedback) = if item.is_objective() {
        let feedback = if item.was_correct {
            GRADING_TEMPLATES.correct
        } else {
            GRADING_TEMPLATES.incorrect
        };
        (objective_score(item.was_correct, item.max_score), feedback)
    } else {
        (
            neutral_partial_credit(item.max_score),
            GRADING_TEMPLATES.unavailable,
        )
    };
    DefaultGrade {
        score,
        feedback,
        knowledge_point: UNDETERMINED_KNOWLEDGE_POINT,
    }
}

/// What the synthesizer knows about the request it stands in for
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackContext<'a> {
    Grading {
        items: &'a [AssessmentItem],
    },
    Question {
        topic: &'a str,
    },
    Exam {
        scope: &'a str,
        objective: usize,
        free_text: usize,
        code: usize,
    },
    Graph {
        topic: &'a str,
    },
}

impl FallbackContext<'_> {
    /// Subject the placeholder is about, if any
    pub fn topic(&self) -> Option<&str> {
        match self {
            FallbackContext::Grading { .. } => None,
            FallbackContext::Question { topic } | FallbackContext::Graph { topic } => Some(*topic),
            FallbackContext::Exam { scope, .. } => Some(*scope),
        }
    }
}

/// Produce a schema-valid placeholder for `domain`.
///
/// When the context does not match the domain, the context's topic (or a
/// generic subject) is used, so the result is still schema-valid.
pub fn synthesize(domain: ExtractionDomain, context: &FallbackContext<'_>) -> Value {
    let topic = context.topic().unwrap_or("this topic");
    match (domain, context) {
        (ExtractionDomain::GradingArray, FallbackContext::Grading { items }) => {
            synthesize_grading(items)
        }
        (ExtractionDomain::GradingArray, _) => Value::Array(Vec::new()),
        (ExtractionDomain::GeneratedQuestion, _) => synthesize_question(topic),
        (
            ExtractionDomain::GeneratedExam,
            FallbackContext::Exam {
                scope,
                objective,
                free_text,
                code,
            },
        ) => synthesize_exam(scope, *objective, *free_text, *code),
        (ExtractionDomain::GeneratedExam, _) => synthesize_exam(topic, 1, 0, 0),
        (ExtractionDomain::KnowledgeGraph, _) => synthesize_graph(topic),
    }
}

/// One default grading record per item, in item order
pub fn synthesize_grading(items: &[AssessmentItem]) -> Value {
    let records = items
        .iter()
        .map(|item| {
            let grade = default_grade(item);
            json!({
                "question_id": item.question_id,
                "score": grade.score,
                "feedback": grade.feedback,
                "knowledge_point": grade.knowledge_point,
            })
        })
        .collect();
    Value::Array(records)
}

pub fn synthesize_question(topic: &str) -> Value {
    json!({
        "question_text": format!("Explain the core concepts of {} and where they apply.", topic),
        "standard_answer": format!(
            "A reference answer for {} has not been generated; review before use.",
            topic
        ),
    })
}

/// Placeholder exam with one question per requested slot (at least one).
pub fn synthesize_exam(scope: &str, objective: usize, free_text: usize, code: usize) -> Value {
    let objective = if objective + free_text + code == 0 {
        1
    } else {
        objective
    };

    let mut questions = Vec::with_capacity(objective + free_text + code);
    for n in 1..=objective {
        questions.push(json!({
            "type": QuestionKind::ObjectiveChoice.as_str(),
            "question_text": format!("Which statement about {} is correct? ({})", scope, n),
            "options": PLACEHOLDER_OPTIONS,
            "answer": "A",
            "explanation": "Placeholder question; replace before publishing.",
            "points": QuestionKind::ObjectiveChoice.default_points(),
        }));
    }
    for n in 1..=free_text {
        questions.push(json!({
            "type": QuestionKind::FreeText.as_str(),
            "question_text": format!("Explain a key idea of {}. ({})", scope, n),
            "answer": "Reference answer pending review.",
            "points": QuestionKind::FreeText.default_points(),
        }));
    }
    for n in 1..=code {
        questions.push(json!({
            "type": QuestionKind::Code.as_str(),
            "question_text": format!("Write a program that demonstrates {}. ({})", scope, n),
            "answer": "Reference solution pending review.",
            "test_cases": [],
            "points": QuestionKind::Code.default_points(),
        }));
    }

    json!({
        "title": format!("{} exam", scope),
        "questions": questions,
    })
}

pub fn synthesize_graph(topic: &str) -> Value {
    let children: Vec<Value> = GRAPH_BRANCHES
        .iter()
        .map(|(branch, leaves)| {
            json!({
                "name": branch,
                "children": leaves.iter().map(|leaf| json!({"name": leaf})).collect::<Vec<_>>(),
            })
        })
        .collect();
    json!({ "name": topic, "children": children })
}

/// Extracted or synthesized value, plus the diagnostics that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub value: Value,
    pub synthesized: bool,
    pub outcome: ExtractionOutcome,
}

/// Extract `raw` for `request`, falling back to a synthesized default.
///
/// Total: always returns a value that satisfies the domain shape.
pub fn extract_or_default(
    raw: &str,
    request: &ExtractionRequest,
    fallback: &FallbackContext<'_>,
) -> Extraction {
    let outcome = TieredExtractor::new().extract(raw, request);
    match outcome.value.clone() {
        Some(value) => Extraction {
            value,
            synthesized: false,
            outcome,
        },
        None => {
            debug!(domain = %request.domain, "synthesizing default value");
            Extraction {
                value: synthesize(request.domain, fallback),
                synthesized: true,
                outcome,
            }
        }
    }
}
