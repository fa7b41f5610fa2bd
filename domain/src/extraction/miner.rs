//! Heuristic Text Miner - last-resort extraction from plain prose.
//!
//! Used only after every machine-readable tier has failed. Works line by
//! line with label patterns, and refuses to guess: grading output is only
//! accepted when the number of mined records equals the number of expected
//! items.

use super::target::{ExtractionDomain, ExtractionRequest};
use crate::grading::scoring::UNDETERMINED_KNOWLEDGE_POINT;
use regex::Regex;
use serde_json::{Map, Value, json};
use std::sync::LazyLock;

/// Line that opens a new grading record: `题目 3`, `第3题`, `3题`, `Question 3`, `Q3`
static QUESTION_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^[\s#*>\-]*(?:第\s*(\d+)\s*题|(?:题目?|question|q)\s*[#:：.]?\s*(\d+)|(\d+)\s*[.、:：)]?\s*(?:题|question)\b)",
    )
    .expect("question marker pattern is valid")
});

/// Labelled field of a grading record, earliest label on the line wins
static GRADING_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(score|分数|得分|feedback|反馈|评语|knowledge[ _-]?point|知识点|考点)\**\s*[:：]\s*(.*)$")
        .expect("grading label pattern is valid")
});

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(-?\d+(?:\.\d+)?)").expect("number pattern is valid")
});

/// Labelled field of a generated practice question
static QUESTION_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[\s#*>\-]*(question|题目|问题|standard answer|reference answer|answer|参考答案|标准答案|答案)\**\s*[:：]\s*(.*)$")
        .expect("question label pattern is valid")
});

/// Strategy for mining records out of unstructured text
///
/// The extractor calls this only as its last tier, which makes the seam a
/// convenient place to instrument tier ordering in tests.
pub trait TextMiner: Send + Sync {
    /// Mine a structured value, or `None` when the text does not fit.
    fn mine(&self, text: &str, request: &ExtractionRequest) -> Option<Value>;
}

/// Label-pattern miner for the grading and practice-question domains
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTextMiner;

impl TextMiner for DefaultTextMiner {
    fn mine(&self, text: &str, request: &ExtractionRequest) -> Option<Value> {
        match request.domain {
            ExtractionDomain::GradingArray => mine_grading_records(text, request.expected_items),
            ExtractionDomain::GeneratedQuestion => mine_practice_question(text),
            ExtractionDomain::GeneratedExam | ExtractionDomain::KnowledgeGraph => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GradingField {
    Score,
    Feedback,
    KnowledgePoint,
}

impl GradingField {
    fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        if matches!(label.as_str(), "score" | "分数" | "得分") {
            GradingField::Score
        } else if matches!(label.as_str(), "feedback" | "反馈" | "评语") {
            GradingField::Feedback
        } else {
            GradingField::KnowledgePoint
        }
    }
}

/// Mine per-question grading records from prose.
///
/// Returns an array only when the record count matches `expected`.
/// Fields that never appear are left out so the schema rejects the record.
pub fn mine_grading_records(text: &str, expected: Option<usize>) -> Option<Value> {
    let mut records: Vec<Map<String, Value>> = Vec::new();
    let mut current: Option<Map<String, Value>> = None;
    let mut last_field: Option<GradingField> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(id) = question_marker(line) {
            records.extend(current.take());
            let mut record = Map::new();
            record.insert("question_id".to_string(), json!(id));
            record.insert(
                "knowledge_point".to_string(),
                json!(UNDETERMINED_KNOWLEDGE_POINT),
            );
            current = Some(record);
            last_field = None;
            continue;
        }

        let Some(record) = current.as_mut() else {
            continue;
        };

        if let Some(caps) = GRADING_LABEL.captures(line) {
            let field = GradingField::from_label(&caps[1]);
            let value = caps[2].trim();
            match field {
                GradingField::Score => {
                    if let Some(score) = LEADING_NUMBER
                        .captures(value)
                        .and_then(|c| c[1].parse::<f64>().ok())
                    {
                        record.insert("score".to_string(), json!(score));
                    }
                }
                GradingField::Feedback => {
                    record.insert("feedback".to_string(), json!(value));
                }
                GradingField::KnowledgePoint if !value.is_empty() => {
                    record.insert("knowledge_point".to_string(), json!(value));
                }
                GradingField::KnowledgePoint => {}
            }
            last_field = Some(field);
        } else if last_field == Some(GradingField::Feedback) {
            // unlabelled lines continue a multi-line feedback paragraph
            append_text(record, "feedback", line, " ");
        }
    }
    records.extend(current);

    let count_ok = match expected {
        Some(n) => records.len() == n,
        None => !records.is_empty(),
    };
    count_ok.then(|| Value::Array(records.into_iter().map(Value::Object).collect()))
}

fn question_marker(line: &str) -> Option<u64> {
    let caps = QUESTION_MARKER.captures(line)?;
    (1..=3)
        .find_map(|i| caps.get(i))
        .and_then(|m| m.as_str().parse().ok())
}

/// Mine a single practice question (`question_text` + `standard_answer`).
pub fn mine_practice_question(text: &str) -> Option<Value> {
    let mut record = Map::new();
    let mut open_field: Option<&'static str> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(caps) = QUESTION_LABEL.captures(line) {
            let key = match caps[1].to_lowercase().as_str() {
                "question" | "题目" | "问题" => "question_text",
                _ => "standard_answer",
            };
            record.insert(key.to_string(), json!(caps[2].trim()));
            open_field = Some(key);
        } else if let Some(key) = open_field {
            append_text(&mut record, key, line, "\n");
        }
    }

    (!record.is_empty()).then_some(Value::Object(record))
}

fn append_text(record: &mut Map<String, Value>, key: &str, line: &str, separator: &str) {
    let existing = record.get(key).and_then(|v| v.as_str()).unwrap_or_default();
    let joined = if existing.is_empty() {
        line.to_string()
    } else {
        format!("{}{}{}", existing, separator, line)
    };
    record.insert(key.to_string(), Value::String(joined));
}
