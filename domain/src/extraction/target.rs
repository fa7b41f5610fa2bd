//! Extraction targets - what shape each domain expects back from the model.

use super::schema::{FieldKind, Schema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of structured value being extracted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionDomain {
    /// Array of per-question grading records
    GradingArray,
    /// A single practice question with its reference answer
    GeneratedQuestion,
    /// An exam paper object holding a `questions` list
    GeneratedExam,
    /// A knowledge graph rooted at a named topic
    KnowledgeGraph,
}

/// Top-level shape a domain expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Array of records. `envelope` names an object field that may wrap it.
    Array { envelope: Option<&'static str> },
    /// Single object. `list_field` names its one list-valued field, if any.
    Object { list_field: Option<&'static str> },
}

impl ExtractionDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionDomain::GradingArray => "grading_array",
            ExtractionDomain::GeneratedQuestion => "generated_question",
            ExtractionDomain::GeneratedExam => "generated_exam",
            ExtractionDomain::KnowledgeGraph => "knowledge_graph",
        }
    }

    pub fn shape(&self) -> Shape {
        match self {
            ExtractionDomain::GradingArray => Shape::Array {
                envelope: Some("results"),
            },
            ExtractionDomain::GeneratedQuestion => Shape::Object { list_field: None },
            ExtractionDomain::GeneratedExam => Shape::Object {
                list_field: Some("questions"),
            },
            ExtractionDomain::KnowledgeGraph => Shape::Object {
                list_field: Some("children"),
            },
        }
    }

    /// Schema for one record of this domain
    pub fn default_schema(&self) -> Schema {
        match self {
            ExtractionDomain::GradingArray => Schema::grading(),
            ExtractionDomain::GeneratedQuestion => Schema::generated_question(),
            ExtractionDomain::GeneratedExam => Schema::generated_exam(),
            ExtractionDomain::KnowledgeGraph => Schema::knowledge_graph(),
        }
    }

    /// Whether this domain declares label patterns for the text miner
    pub fn supports_mining(&self) -> bool {
        matches!(
            self,
            ExtractionDomain::GradingArray | ExtractionDomain::GeneratedQuestion
        )
    }
}

impl std::fmt::Display for ExtractionDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything the extractor needs to know about one extraction
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionRequest {
    pub domain: ExtractionDomain,
    pub schema: Schema,
    /// Number of records the caller expects (used by the text miner)
    pub expected_items: Option<usize>,
}

impl ExtractionRequest {
    /// Request with the domain's default schema
    pub fn new(domain: ExtractionDomain) -> Self {
        Self {
            domain,
            schema: domain.default_schema(),
            expected_items: None,
        }
    }

    /// Request requiring exactly `required_fields`.
    ///
    /// Fields known to the domain schema keep their declared kind (so a
    /// grading `score` stays numeric); any other field must be a non-empty
    /// string.
    pub fn with_required_fields<I, S>(domain: ExtractionDomain, required_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let defaults = domain.default_schema();
        let schema = required_fields
            .into_iter()
            .fold(Schema::new(), |schema, name| {
                let name = name.into();
                let kind = defaults
                    .kind_of(&name)
                    .cloned()
                    .unwrap_or(FieldKind::NonEmptyString);
                schema.with_field(name, kind)
            });
        Self {
            domain,
            schema,
            expected_items: None,
        }
    }

    /// Grading request for a paper with `expected_items` questions
    pub fn grading(expected_items: usize) -> Self {
        Self::new(ExtractionDomain::GradingArray).expecting(expected_items)
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    pub fn expecting(mut self, count: usize) -> Self {
        self.expected_items = Some(count);
        self
    }

    /// Does `value` satisfy both the domain shape and the record schema?
    pub fn accepts(&self, value: &Value) -> bool {
        match self.domain.shape() {
            Shape::Array { .. } => value.as_array().is_some_and(|records| {
                !records.is_empty() && records.iter().all(|r| self.schema.is_valid(r))
            }),
            Shape::Object { .. } => self.schema.is_valid(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_grading_accepts_only_arrays_of_valid_records() {
        let request = ExtractionRequest::grading(1);
        let record = json!({"question_id": 1, "score": 5, "feedback": "Good", "knowledge_point": "K"});
        assert!(request.accepts(&json!([record.clone()])));
        assert!(!request.accepts(&record));
        assert!(!request.accepts(&json!([])));
        assert!(!request.accepts(&json!([record, {"question_id": 2}])));
    }

    #[test]
    fn test_required_fields_request() {
        let request =
            ExtractionRequest::with_required_fields(ExtractionDomain::GeneratedQuestion, ["title"]);
        assert!(request.accepts(&json!({"title": "x"})));
        assert!(!request.accepts(&json!({"question_text": "x"})));
    }

    #[test]
    fn test_required_fields_keep_domain_kinds() {
        let request = ExtractionRequest::with_required_fields(
            ExtractionDomain::GradingArray,
            ["question_id", "score", "feedback"],
        );
        assert!(request.accepts(&json!([{"question_id": 1, "score": 2, "feedback": "ok"}])));
        assert!(!request.accepts(&json!([{"question_id": 1, "score": "two", "feedback": "ok"}])));
    }

    #[test]
    fn test_mining_support() {
        assert!(ExtractionDomain::GradingArray.supports_mining());
        assert!(ExtractionDomain::GeneratedQuestion.supports_mining());
        assert!(!ExtractionDomain::GeneratedExam.supports_mining());
        assert!(!ExtractionDomain::KnowledgeGraph.supports_mining());
    }
}
