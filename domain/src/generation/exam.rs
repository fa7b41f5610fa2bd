//! Generated exam papers and their conversion into publishable questions.

use crate::core::error::DomainError;
use crate::core::question::{ExamPaper, MAX_OPTIONS, Question, QuestionKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How many questions of each kind to ask the model for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamBlueprint {
    pub scope: String,
    pub objective: usize,
    pub free_text: usize,
    pub code: usize,
}

impl ExamBlueprint {
    /// Blueprint with the usual mix: 5 objective, 3 free text, 1 code
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            objective: 5,
            free_text: 3,
            code: 1,
        }
    }

    pub fn with_counts(mut self, objective: usize, free_text: usize, code: usize) -> Self {
        self.objective = objective;
        self.free_text = free_text;
        self.code = code;
        self
    }

    pub fn total(&self) -> usize {
        self.objective + self.free_text + self.code
    }

    pub fn default_title(&self) -> String {
        format!("{} exam", self.scope)
    }
}

/// One question as the model described it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedExamQuestion {
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub question_text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    /// Points as stated by the model; `None` when missing or not positive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_cases: Vec<String>,
}

impl GeneratedExamQuestion {
    pub fn points_or_default(&self) -> u32 {
        self.points.unwrap_or_else(|| self.kind.default_points())
    }

    /// Convert into a publishable question with the given id.
    pub fn to_question(&self, id: u64) -> Question {
        let question = Question::new(
            id,
            self.kind,
            self.question_text.clone(),
            self.answer.clone(),
            self.points_or_default(),
        );
        if self.kind.is_objective() {
            question.with_options(self.options.iter().take(MAX_OPTIONS).cloned())
        } else {
            question
        }
    }
}

/// A generated exam paper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedExam {
    pub title: String,
    pub questions: Vec<GeneratedExamQuestion>,
}

impl GeneratedExam {
    /// Parse an extracted exam value.
    ///
    /// Expected shape:
    /// ```json
    /// {
    ///   "title": "string (optional)",
    ///   "questions": [
    ///     {"type": "multiple_choice", "question_text": "...", "options": ["A. ..."],
    ///      "answer": "A", "explanation": "...", "points": 5, "test_cases": []}
    ///   ]
    /// }
    /// ```
    ///
    /// Questions without text are skipped. Returns `None` when no usable
    /// question remains.
    pub fn from_value(json: &Value, default_title: &str) -> Option<Self> {
        let title = json
            .get("title")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(default_title)
            .to_string();

        let questions: Vec<GeneratedExamQuestion> = json
            .get("questions")
            .and_then(|v| v.as_array())?
            .iter()
            .filter_map(parse_question)
            .collect();

        if questions.is_empty() {
            return None;
        }
        Some(Self { title, questions })
    }

    /// Publishable questions numbered from `first_id`
    pub fn to_questions(&self, first_id: u64) -> Vec<Question> {
        self.questions
            .iter()
            .zip(first_id..)
            .map(|(q, id)| q.to_question(id))
            .collect()
    }

    /// Validated paper numbered from `first_id`
    pub fn to_paper(&self, first_id: u64) -> Result<ExamPaper, DomainError> {
        ExamPaper::new(self.to_questions(first_id))
    }

    pub fn count(&self, kind: QuestionKind) -> usize {
        self.questions.iter().filter(|q| q.kind == kind).count()
    }
}

fn parse_question(json: &Value) -> Option<GeneratedExamQuestion> {
    let question_text = json
        .get("question_text")
        .or_else(|| json.get("question"))
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())?
        .to_string();

    let options = string_list(json.get("options"));
    let kind = json
        .get("type")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse::<QuestionKind>().ok())
        .unwrap_or(if options.is_empty() {
            QuestionKind::FreeText
        } else {
            QuestionKind::ObjectiveChoice
        });

    let answer = json
        .get("answer")
        .or_else(|| json.get("standard_answer"))
        .and_then(scalar_to_string)
        .unwrap_or_default();

    let explanation = json
        .get("explanation")
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string);

    let points = json
        .get("points")
        .and_then(|v| v.as_f64())
        .filter(|p| *p >= 1.0)
        .map(|p| p.round() as u32);

    Some(GeneratedExamQuestion {
        kind,
        question_text,
        options,
        answer,
        explanation,
        points,
        test_cases: string_list(json.get("test_cases")),
    })
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(|v| v.as_array())
        .map(|items| items.iter().filter_map(scalar_to_string).collect())
        .unwrap_or_default()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
