//! Prompt templates for grading and content generation

use crate::generation::exam::ExamBlueprint;
use crate::grading::assessment::AssessmentItem;

/// Templates for every request sent to the model
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for the qualitative assessor
    pub fn grading_system() -> &'static str {
        r#"You are a rigorous but fair teaching assistant grading exam answers.
Judge each answer against its reference answer and the question's intent.
For objective questions the correctness has already been decided by rule; only give feedback.
Respond with JSON only."#
    }

    /// Single batch request covering every item of a submission
    pub fn grading_batch(items: &[AssessmentItem]) -> String {
        let batch = serde_json::to_string_pretty(items).unwrap_or_default();
        format!(
            r#"Grade the following {} answers. Each item lists the question, its type, the reference answer,
the learner's answer, a literal-match hint (was_correct) and the maximum score.

{}

Return a JSON array with exactly one object per item, in any order:
[
  {{
    "question_id": <id of the item>,
    "score": <integer between 0 and max_score>,
    "feedback": "<specific, constructive feedback>",
    "knowledge_point": "<short name of the concept being tested>"
  }}
]"#,
            items.len(),
            batch
        )
    }

    /// System prompt for all generation requests
    pub fn generation_system() -> &'static str {
        r#"You are an experienced instructor who writes clear, accurate teaching material.
Respond with JSON only, following the requested structure exactly."#
    }

    /// Request for one practice question
    pub fn practice_question(topic: &str) -> String {
        format!(
            r#"Write one practice question about "{}".
It should require some thought, be useful in practice, and come with a reference answer.

Return JSON:
{{
  "question_text": "<the question>",
  "standard_answer": "<the reference answer>"
}}"#,
            topic
        )
    }

    /// Request for a full exam paper
    pub fn exam(blueprint: &ExamBlueprint) -> String {
        format!(
            r#"Write an exam covering "{}" with:
- {} multiple choice questions
- {} short answer questions
- {} programming questions

Return JSON:
{{
  "title": "<exam title>",
  "questions": [
    {{"type": "multiple_choice", "question_text": "...", "options": ["A. ...", "B. ...", "C. ...", "D. ..."], "answer": "A", "explanation": "...", "points": 5}},
    {{"type": "short_answer", "question_text": "...", "answer": "<reference answer>", "points": 10}},
    {{"type": "programming", "question_text": "...", "answer": "<reference code>", "test_cases": ["..."], "points": 20}}
  ]
}}"#,
            blueprint.scope, blueprint.objective, blueprint.free_text, blueprint.code
        )
    }

    /// Request for a knowledge graph (mind map) of a topic
    pub fn knowledge_graph(topic: &str, description: Option<&str>) -> String {
        let description = description
            .map(|d| format!("\nDescription: {}\n", d))
            .unwrap_or_default();
        format!(
            r#"Build a structured knowledge graph for the topic "{}".
{}
Return JSON:
{{
  "name": "<topic>",
  "children": [
    {{"name": "<branch>", "children": [{{"name": "<leaf>"}}, {{"name": "<leaf>"}}]}}
  ]
}}"#,
            topic, description
        )
    }
}
