//! Grade Exam use case
//!
//! The grading orchestrator: precheck every answer, send one batch
//! assessment request, extract the reply, reconcile by question id, and
//! return one result per question. Grading always completes; transport and
//! extraction failures degrade to synthesized results.

use crate::config::GradingConfig;
use crate::ports::audit_log::{AuditEvent, AuditEventKind, AuditLogger, NoAuditLogger};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::progress::{GradingProgressNotifier, NoProgress};
use gradewise_domain::{
    AssessmentItem, ExtractionAttempt, ExtractionRequest, FallbackReason, GradeSummary,
    GradingOutcome, GradingResult, GradingState, PromptTemplate, Question, SubmissionAnswer,
    Tier, TieredExtractor, precheck_all, resolve,
};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Input for the GradeExam use case
#[derive(Debug, Clone, Default)]
pub struct GradeExamInput {
    pub questions: Vec<Question>,
    pub answers: Vec<SubmissionAnswer>,
}

impl GradeExamInput {
    pub fn new(questions: Vec<Question>, answers: Vec<SubmissionAnswer>) -> Self {
        Self { questions, answers }
    }
}

/// Complete, ordered outcome of grading one submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeReport {
    /// One result per question, ascending by question id
    pub results: Vec<GradingResult>,
    pub summary: GradeSummary,
    pub outcome: GradingOutcome,
    /// Tier that produced the extracted records, if extraction succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_tier: Option<Tier>,
    /// Extraction diagnostics (empty when the assessor was unreachable)
    pub attempts: Vec<ExtractionAttempt>,
}

impl GradeReport {
    pub fn is_degraded(&self) -> bool {
        self.outcome.is_degraded()
    }
}

/// Use case for grading a submitted exam paper
pub struct GradeExamUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    config: GradingConfig,
    audit: Arc<dyn AuditLogger>,
    extractor: TieredExtractor,
}

impl<G: LlmGateway + 'static> GradeExamUseCase<G> {
    pub fn new(gateway: Arc<G>, config: GradingConfig) -> Self {
        Self {
            gateway,
            config,
            audit: Arc::new(NoAuditLogger),
            extractor: TieredExtractor::new(),
        }
    }

    pub fn with_audit_logger(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    /// Grade and return only the ordered results
    pub async fn grade(
        &self,
        questions: Vec<Question>,
        answers: Vec<SubmissionAnswer>,
    ) -> Vec<GradingResult> {
        self.execute(GradeExamInput::new(questions, answers))
            .await
            .results
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: GradeExamInput) -> GradeReport {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: GradeExamInput,
        progress: &dyn GradingProgressNotifier,
    ) -> GradeReport {
        let count = input.questions.len();
        info!("Grading {} questions with {}", count, self.config.model);

        progress.on_state(GradingState::Precheck, count);
        let items = precheck_all(&input.questions, &input.answers);
        debug!(
            "Precheck: {} of {} answers match their reference literally",
            items.iter().filter(|i| i.was_correct).count(),
            count
        );

        if items.is_empty() {
            return self.finish(Vec::new(), GradingOutcome::Assessed, None, Vec::new(), progress);
        }

        progress.on_state(GradingState::AssessRequested, count);
        self.audit.log(AuditEvent::new(
            AuditEventKind::AssessmentRequested,
            json!({ "model": self.config.model.as_str(), "items": count }),
        ));

        let (extracted, tier, attempts) = match self.request_assessment(&items).await {
            Ok(raw) => {
                progress.on_state(GradingState::Extracting, count);
                let request = ExtractionRequest::grading(count);
                let outcome = self.extractor.extract(&raw, &request);
                progress.on_extraction(outcome.tier);
                self.audit.log(AuditEvent::new(
                    AuditEventKind::ExtractionCompleted,
                    json!({
                        "response_bytes": raw.len(),
                        "tier": outcome.tier,
                        "attempts": outcome.attempts,
                    }),
                ));
                let extracted = outcome.value.ok_or(FallbackReason::Structural);
                (extracted, outcome.tier, outcome.attempts)
            }
            Err(e) => {
                warn!("Assessment request failed, synthesizing results: {}", e);
                self.audit.log(AuditEvent::new(
                    AuditEventKind::AssessmentFailed,
                    json!({ "error": e.to_string() }),
                ));
                (Err(FallbackReason::Transport), None, Vec::new())
            }
        };

        progress.on_state(GradingState::Reconciling, count);
        let reconciliation = resolve(&items, extracted.as_ref().map_err(|reason| *reason));
        if let GradingOutcome::Synthesized { reason } = reconciliation.outcome {
            warn!("Falling back to synthesized results ({})", reason);
        }

        self.finish(
            reconciliation.results,
            reconciliation.outcome,
            tier,
            attempts,
            progress,
        )
    }

    fn finish(
        &self,
        results: Vec<GradingResult>,
        outcome: GradingOutcome,
        extraction_tier: Option<Tier>,
        attempts: Vec<ExtractionAttempt>,
        progress: &dyn GradingProgressNotifier,
    ) -> GradeReport {
        progress.on_state(GradingState::Done, results.len());
        let summary = GradeSummary::from_results(&results);
        info!(
            "Grading complete: {}/{} ({:?})",
            summary.total_score, summary.max_total, outcome
        );
        self.audit.log(AuditEvent::new(
            AuditEventKind::GradingCompleted,
            json!({
                "outcome": outcome,
                "total_score": summary.total_score,
                "max_total": summary.max_total,
                "results": results_payload(&results),
            }),
        ));
        progress.on_complete(&outcome);

        GradeReport {
            results,
            summary,
            outcome,
            extraction_tier,
            attempts,
        }
    }

    /// The single batched call to the assessor, bounded by the configured timeout
    async fn request_assessment(&self, items: &[AssessmentItem]) -> Result<String, GatewayError> {
        let call = async {
            let session = self
                .gateway
                .create_session_with_system_prompt(
                    &self.config.model,
                    PromptTemplate::grading_system(),
                )
                .await?;
            session.send(&PromptTemplate::grading_batch(items)).await
        };

        match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| GatewayError::Timeout)?,
            None => call.await,
        }
    }
}

fn results_payload(results: &[GradingResult]) -> Value {
    Value::Array(
        results
            .iter()
            .map(|r| {
                json!({
                    "question_id": r.question_id,
                    "score": r.score,
                    "max_score": r.max_score,
                    "source": r.source,
                })
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::{RecordingAuditLogger, ScriptedGateway};
    use gradewise_domain::{QuestionKind, ScoreSource};
    use std::sync::Mutex;
    use std::time::Duration;

    fn setup(gateway: ScriptedGateway) -> (GradeExamUseCase<ScriptedGateway>, Arc<ScriptedGateway>) {
        let gateway = Arc::new(gateway);
        (
            GradeExamUseCase::new(Arc::clone(&gateway), GradingConfig::default()),
            gateway,
        )
    }

    fn mixed_paper() -> GradeExamInput {
        GradeExamInput::new(
            vec![
                Question::free_text(2, "Explain borrowing", "Temporary access via references", 10),
                Question::objective(1, "Which keyword declares a constant?", "B", 5)
                    .with_options(["A. let", "B. const"]),
            ],
            vec![
                SubmissionAnswer::new(1, "b"),
                SubmissionAnswer::new(2, "You lend a reference"),
            ],
        )
    }

    #[tokio::test]
    async fn test_single_objective_question_assessed() {
        let (use_case, gateway) = setup(ScriptedGateway::replying(
            r#"[{"question_id":1,"score":5,"feedback":"correct","knowledge_point":"X"}]"#,
        ));
        let report = use_case
            .execute(GradeExamInput::new(
                vec![Question::objective(1, "Pick", "A", 5).with_options(["A", "B"])],
                vec![SubmissionAnswer::new(1, "A")],
            ))
            .await;

        assert_eq!(report.outcome, GradingOutcome::Assessed);
        assert_eq!(report.extraction_tier, Some(Tier::DirectParse));
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].score, 5);
        assert_eq!(report.results[0].feedback, "correct");
        assert_eq!(report.results[0].knowledge_point, "X");
        assert!(!report.results[0].allow_dispute);
        assert_eq!(gateway.sent_prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_unusable_reply_synthesizes_every_item() {
        let (use_case, _) = setup(ScriptedGateway::replying(
            "I cannot grade this without more information.",
        ));
        let report = use_case.execute(mixed_paper()).await;

        assert_eq!(
            report.outcome,
            GradingOutcome::Synthesized {
                reason: FallbackReason::Structural
            }
        );
        assert_eq!(report.results.len(), 2);
        // objective scored by precheck, free text at neutral partial credit
        assert_eq!(report.results[0].question_id.value(), 1);
        assert_eq!(report.results[0].score, 5);
        assert_eq!(report.results[1].score, 5);
        assert!(report.results.iter().all(|r| r.source == ScoreSource::Synthesized));
        assert_eq!(report.attempts.len(), Tier::ORDER.len());
    }

    #[tokio::test]
    async fn test_object_in_prose_for_single_item() {
        let (use_case, _) = setup(ScriptedGateway::replying(
            "Here you go: {\"question_id\": 7, \"score\": 8, \"feedback\": \"Solid\", \"knowledge_point\": \"Iterators\"} Thanks!",
        ));
        let report = use_case
            .execute(GradeExamInput::new(
                vec![Question::code(7, "Sum a vec", "v.iter().sum()", 10)],
                vec![SubmissionAnswer::new(7, "v.into_iter().sum::<i32>()")],
            ))
            .await;

        assert_eq!(report.outcome, GradingOutcome::Assessed);
        assert_eq!(report.extraction_tier, Some(Tier::ShapeCoercion));
        assert_eq!(report.results[0].score, 8);
        assert_eq!(report.results[0].source, ScoreSource::Assessment);
        assert!(report.results[0].allow_dispute);
    }

    #[tokio::test]
    async fn test_count_mismatch_discards_everything() {
        let (use_case, _) = setup(ScriptedGateway::replying(
            r#"[
                {"question_id": 1, "score": 5, "feedback": "a", "knowledge_point": "k"},
                {"question_id": 2, "score": 9, "feedback": "b", "knowledge_point": "k"},
                {"question_id": 3, "score": 1, "feedback": "c", "knowledge_point": "k"}
            ]"#,
        ));
        let report = use_case.execute(mixed_paper()).await;

        assert_eq!(
            report.outcome,
            GradingOutcome::Synthesized {
                reason: FallbackReason::CountMismatch
            }
        );
        assert_eq!(report.results[1].score, 5);
        assert!(report.results[1].feedback.contains("unavailable"));
    }

    #[tokio::test]
    async fn test_objective_score_ignores_assessor_and_free_text_is_clamped() {
        let (use_case, _) = setup(ScriptedGateway::replying(
            r#"{"results": [
                {"question_id": 1, "score": 0, "feedback": "Wrong!", "knowledge_point": "consts"},
                {"question_id": 2, "score": 42, "feedback": "Excellent", "knowledge_point": "borrowing"}
            ]}"#,
        ));
        let report = use_case.execute(mixed_paper()).await;

        assert_eq!(report.outcome, GradingOutcome::Assessed);
        assert_eq!(report.results[0].score, 5);
        assert_eq!(report.results[0].source, ScoreSource::Rule);
        assert_eq!(report.results[0].feedback, "Wrong!");
        assert_eq!(report.results[1].score, 10);
        assert_eq!(report.summary.total_score, 15);
        assert_eq!(report.summary.max_total, 15);
    }

    #[tokio::test]
    async fn test_transport_error_is_absorbed() {
        let (use_case, _) = setup(ScriptedGateway::failing(GatewayError::ConnectionError(
            "refused".to_string(),
        )));
        let audit = Arc::new(RecordingAuditLogger::default());
        let use_case = use_case.with_audit_logger(audit.clone());

        let results = use_case
            .grade(mixed_paper().questions, mixed_paper().answers)
            .await;

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.source == ScoreSource::Synthesized));
        assert_eq!(
            audit.kinds(),
            vec!["assessment_requested", "assessment_failed", "grading_completed"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_a_transport_failure() {
        let gateway = Arc::new(
            ScriptedGateway::replying("[]").with_delay(Duration::from_secs(120)),
        );
        let use_case = GradeExamUseCase::new(
            Arc::clone(&gateway),
            GradingConfig::default().with_timeout_seconds(5),
        );
        let report = use_case.execute(mixed_paper()).await;

        assert_eq!(
            report.outcome,
            GradingOutcome::Synthesized {
                reason: FallbackReason::Transport
            }
        );
        assert!(report.attempts.is_empty());
    }

    #[tokio::test]
    async fn test_missing_answers_and_garbage_still_complete() {
        let questions: Vec<Question> = (1..=4)
            .map(|id| Question::new(id, QuestionKind::FreeText, "Q", "A", 3))
            .collect();
        for reply in ["", "null", "[[[", "{\"results\": 5}", "题目1\n得分：2"] {
            let (use_case, _) = setup(ScriptedGateway::replying(reply));
            let results = use_case.grade(questions.clone(), Vec::new()).await;
            assert_eq!(results.len(), 4, "reply {:?}", reply);
            assert!(results.iter().all(|r| r.score <= r.max_score));
        }
    }

    #[tokio::test]
    async fn test_progress_walks_every_state() {
        struct Recorder(Mutex<Vec<GradingState>>);
        impl GradingProgressNotifier for Recorder {
            fn on_state(&self, state: GradingState, _item_count: usize) {
                self.0.lock().unwrap().push(state);
            }
        }

        let (use_case, gateway) = setup(ScriptedGateway::replying("no json here"));
        let recorder = Recorder(Mutex::new(Vec::new()));
        use_case
            .execute_with_progress(mixed_paper(), &recorder)
            .await;

        assert_eq!(*recorder.0.lock().unwrap(), GradingState::ORDER.to_vec());
        let prompt = &gateway.sent_prompts()[0];
        assert!(prompt.contains("\"learner_answer\": \"You lend a reference\""));
    }

    #[tokio::test]
    async fn test_empty_paper_skips_the_assessor() {
        let (use_case, gateway) = setup(ScriptedGateway::new(Vec::new()));
        let report = use_case.execute(GradeExamInput::default()).await;
        assert!(report.results.is_empty());
        assert!(gateway.sent_prompts().is_empty());
    }
}
