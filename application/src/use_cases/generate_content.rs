//! Generate Content use case
//!
//! Practice questions, exam papers and knowledge graphs, each produced by a
//! single model call run through the same extract-or-default pipeline as
//! grading. A transport failure yields the synthesized placeholder.

use crate::config::GradingConfig;
use crate::ports::audit_log::{AuditEvent, AuditEventKind, AuditLogger, NoAuditLogger};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use gradewise_domain::{
    ExamBlueprint, Extraction, ExtractionDomain, ExtractionRequest, FallbackContext,
    GeneratedExam, GeneratedQuestion, KnowledgeGraph, PromptTemplate, Tier, extract_or_default,
    synthesize,
};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur while turning generated content into entities
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateContentError {
    #[error("No usable {0} could be built, not even a placeholder")]
    Unusable(ExtractionDomain),
}

/// Generated entity plus how it was obtained
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Generated<T> {
    pub content: T,
    /// True when the placeholder was used instead of model output
    pub synthesized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
}

/// Use case for generating teaching content
pub struct GenerateContentUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    config: GradingConfig,
    audit: Arc<dyn AuditLogger>,
}

impl<G: LlmGateway + 'static> GenerateContentUseCase<G> {
    pub fn new(gateway: Arc<G>, config: GradingConfig) -> Self {
        Self {
            gateway,
            config,
            audit: Arc::new(NoAuditLogger),
        }
    }

    pub fn with_audit_logger(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    /// Generate one practice question about `topic`
    pub async fn generate_question(
        &self,
        topic: &str,
    ) -> Result<Generated<GeneratedQuestion>, GenerateContentError> {
        let prompt = PromptTemplate::practice_question(topic);
        let request = ExtractionRequest::new(ExtractionDomain::GeneratedQuestion);
        let context = FallbackContext::Question { topic };
        self.generate(&prompt, &request, &context, GeneratedQuestion::from_value)
            .await
    }

    /// Generate an exam paper following `blueprint`
    pub async fn generate_exam(
        &self,
        blueprint: &ExamBlueprint,
    ) -> Result<Generated<GeneratedExam>, GenerateContentError> {
        let prompt = PromptTemplate::exam(blueprint);
        let request = ExtractionRequest::new(ExtractionDomain::GeneratedExam);
        let context = FallbackContext::Exam {
            scope: &blueprint.scope,
            objective: blueprint.objective,
            free_text: blueprint.free_text,
            code: blueprint.code,
        };
        let title = blueprint.default_title();
        self.generate(&prompt, &request, &context, |value| {
            GeneratedExam::from_value(value, &title)
        })
        .await
    }

    /// Generate a knowledge graph rooted at `topic`
    pub async fn generate_graph(
        &self,
        topic: &str,
        description: Option<&str>,
    ) -> Result<Generated<KnowledgeGraph>, GenerateContentError> {
        let prompt = PromptTemplate::knowledge_graph(topic, description);
        let request = ExtractionRequest::new(ExtractionDomain::KnowledgeGraph);
        let context = FallbackContext::Graph { topic };
        self.generate(&prompt, &request, &context, |value| {
            KnowledgeGraph::from_value(value, topic)
        })
        .await
    }

    async fn generate<T, F>(
        &self,
        prompt: &str,
        request: &ExtractionRequest,
        context: &FallbackContext<'_>,
        read: F,
    ) -> Result<Generated<T>, GenerateContentError>
    where
        F: Fn(&Value) -> Option<T>,
    {
        let domain = request.domain;
        info!("Generating {} with {}", domain, self.config.model);

        let raw = match self.request(prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Generation request failed, using placeholder: {}", e);
                String::new()
            }
        };

        let Extraction {
            value,
            synthesized,
            outcome,
        } = extract_or_default(&raw, request, context);

        // A value can pass the schema and still hold nothing usable
        // (e.g. every question lacks text); fall back to the placeholder.
        let (content, synthesized) = match read(&value) {
            Some(content) => (content, synthesized),
            None => {
                warn!("Extracted {} was unusable, using placeholder", domain);
                let placeholder = synthesize(domain, context);
                let content = read(&placeholder).ok_or(GenerateContentError::Unusable(domain))?;
                (content, true)
            }
        };
        let tier = if synthesized { None } else { outcome.tier };

        self.audit.log(AuditEvent::new(
            AuditEventKind::GenerationCompleted,
            json!({
                "domain": domain,
                "synthesized": synthesized,
                "tier": tier,
                "response_bytes": raw.len(),
            }),
        ));

        Ok(Generated {
            content,
            synthesized,
            tier,
        })
    }

    async fn request(&self, prompt: &str) -> Result<String, GatewayError> {
        let call = async {
            let session = self
                .gateway
                .create_session_with_system_prompt(
                    &self.config.model,
                    PromptTemplate::generation_system(),
                )
                .await?;
            session.send(prompt).await
        };

        match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| GatewayError::Timeout)?,
            None => call.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::{RecordingAuditLogger, ScriptedGateway};
    use gradewise_domain::QuestionKind;

    fn setup(gateway: ScriptedGateway) -> GenerateContentUseCase<ScriptedGateway> {
        GenerateContentUseCase::new(Arc::new(gateway), GradingConfig::default())
    }

    #[tokio::test]
    async fn test_generate_question_from_fenced_json() {
        let use_case = setup(ScriptedGateway::replying(
            "```json\n{\"question_text\": \"What does `?` do?\", \"standard_answer\": \"Propagates errors\"}\n```",
        ));
        let generated = use_case.generate_question("error handling").await.unwrap();

        assert!(!generated.synthesized);
        assert_eq!(generated.tier, Some(Tier::BracketedRegion));
        assert_eq!(generated.content.standard_answer, "Propagates errors");
    }

    #[tokio::test]
    async fn test_generate_question_from_labelled_prose() {
        let use_case = setup(ScriptedGateway::replying(
            "题目：什么是所有权？\n答案：每个值都有唯一的所有者。",
        ));
        let generated = use_case.generate_question("所有权").await.unwrap();

        assert_eq!(generated.tier, Some(Tier::TextMining));
        assert_eq!(generated.content.question_text, "什么是所有权？");
    }

    #[tokio::test]
    async fn test_generate_exam_from_bare_list() {
        let use_case = setup(ScriptedGateway::replying(
            r#"[{"type": "programming", "question_text": "Implement Display", "answer": "impl fmt::Display"}]"#,
        ));
        let blueprint = ExamBlueprint::new("Traits").with_counts(0, 0, 1);
        let generated = use_case.generate_exam(&blueprint).await.unwrap();

        assert_eq!(generated.tier, Some(Tier::ShapeCoercion));
        assert_eq!(generated.content.title, "Traits exam");
        assert_eq!(generated.content.to_questions(1)[0].max_score, 20);
    }

    #[tokio::test]
    async fn test_generate_exam_transport_failure_uses_placeholder() {
        let use_case = setup(ScriptedGateway::failing(GatewayError::Timeout));
        let blueprint = ExamBlueprint::new("Closures").with_counts(2, 1, 0);
        let generated = use_case.generate_exam(&blueprint).await.unwrap();

        assert!(generated.synthesized);
        assert_eq!(generated.tier, None);
        assert_eq!(generated.content.questions.len(), 3);
        assert_eq!(generated.content.count(QuestionKind::ObjectiveChoice), 2);
        assert!(generated.content.to_paper(1).is_ok());
    }

    #[tokio::test]
    async fn test_schema_valid_but_unusable_exam_falls_back() {
        let use_case = setup(ScriptedGateway::replying(r#"{"questions": [{"type": "short_answer"}]}"#));
        let generated = use_case
            .generate_exam(&ExamBlueprint::new("Rust").with_counts(1, 0, 0))
            .await
            .unwrap();
        assert!(generated.synthesized);
        assert_eq!(generated.content.questions.len(), 1);
    }

    #[tokio::test]
    async fn test_generate_graph() {
        let audit = Arc::new(RecordingAuditLogger::default());
        let use_case = setup(ScriptedGateway::replying(
            "Mind map: {name: 'Lifetimes', children: [{name: 'Elision'}, {name: 'Bounds', children: ['static']}]}",
        ))
        .with_audit_logger(audit.clone());
        let generated = use_case.generate_graph("Lifetimes", None).await.unwrap();

        assert_eq!(generated.tier, Some(Tier::Sanitized));
        assert_eq!(generated.content.node_count(), 4);
        assert_eq!(audit.kinds(), vec!["generation_completed"]);
    }

    #[tokio::test]
    async fn test_generate_graph_from_prose_uses_placeholder() {
        let use_case = setup(ScriptedGateway::replying("Lifetimes are a big topic."));
        let generated = use_case.generate_graph("Lifetimes", Some("advanced")).await.unwrap();

        assert!(generated.synthesized);
        assert_eq!(generated.content.topic(), "Lifetimes");
        assert_eq!(generated.content.node_count(), 13);
        assert_eq!(generated.content.depth(), 3);
    }
}
