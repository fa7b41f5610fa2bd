//! Schema Validator - structural contracts for extracted values.
//!
//! Validation is a pure predicate: any input that does not satisfy the
//! contract (including non-objects) simply yields `false`.

use serde_json::Value;

/// Check the plain required-fields contract.
///
/// True iff `candidate` is an object and every required key maps to a
/// non-empty string.
pub fn is_valid<I, S>(candidate: &Value, required_fields: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let Some(object) = candidate.as_object() else {
        return false;
    };
    required_fields
        .into_iter()
        .all(|field| object.get(field.as_ref()).is_some_and(is_non_empty_string))
}

fn is_non_empty_string(value: &Value) -> bool {
    value.as_str().is_some_and(|s| !s.trim().is_empty())
}

/// Read a number from a JSON number or a numeric string.
pub fn numeric_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Read a non-negative integral number (JSON number or numeric string).
pub fn integer_value(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let n = numeric_value(value)?;
    (n >= 0.0 && n.fract() == 0.0 && n <= u64::MAX as f64).then_some(n as u64)
}

/// Expected type of a required field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// String with at least one non-whitespace character
    NonEmptyString,
    /// Number (or numeric string), optionally bounded (inclusive)
    Number { min: Option<f64>, max: Option<f64> },
    /// Non-negative integral number (or numeric string)
    Integer,
    /// Array with at least one element
    NonEmptyArray,
}

impl FieldKind {
    /// Unbounded number
    pub fn number() -> Self {
        FieldKind::Number {
            min: None,
            max: None,
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldKind::NonEmptyString => is_non_empty_string(value),
            FieldKind::Number { min, max } => numeric_value(value).is_some_and(|n| {
                min.is_none_or(|lo| n >= lo) && max.is_none_or(|hi| n <= hi)
            }),
            FieldKind::Integer => integer_value(value).is_some(),
            FieldKind::NonEmptyArray => value.as_array().is_some_and(|a| !a.is_empty()),
        }
    }
}

/// A required field and its expected type
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
}

/// Named structural contract for one extracted record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schema where every field must be a non-empty string.
    pub fn required_strings<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        fields.into_iter().fold(Self::new(), |schema, name| {
            schema.with_field(name, FieldKind::NonEmptyString)
        })
    }

    pub fn with_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        self.fields.retain(|f| f.name != name);
        self.fields.push(FieldSpec { name, kind });
        self
    }

    /// One grading record. Score bounds are enforced later by clamping.
    pub fn grading() -> Self {
        Self::new()
            .with_field("question_id", FieldKind::Integer)
            .with_field("score", FieldKind::number())
            .with_field("feedback", FieldKind::NonEmptyString)
            .with_field("knowledge_point", FieldKind::NonEmptyString)
    }

    /// A generated practice question
    pub fn generated_question() -> Self {
        Self::required_strings(["question_text", "standard_answer"])
    }

    /// A generated exam paper; the title is optional
    pub fn generated_exam() -> Self {
        Self::new().with_field("questions", FieldKind::NonEmptyArray)
    }

    /// A generated knowledge graph; the root name is optional
    pub fn knowledge_graph() -> Self {
        Self::new().with_field("children", FieldKind::NonEmptyArray)
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn kind_of(&self, name: &str) -> Option<&FieldKind> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.kind)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn is_valid(&self, candidate: &Value) -> bool {
        let Some(object) = candidate.as_object() else {
            return false;
        };
        self.fields
            .iter()
            .all(|spec| object.get(&spec.name).is_some_and(|v| spec.kind.accepts(v)))
    }
}
