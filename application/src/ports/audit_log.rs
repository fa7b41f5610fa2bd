//! Port for the structured grading audit trail.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port records what was
//! asked, what came back, and how each score was produced, in a
//! machine-readable format (JSONL).

use serde_json::Value;

/// Kind of audit record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEventKind {
    /// The batch assessment request was sent
    AssessmentRequested,
    /// The assessor could not be reached, errored, or timed out
    AssessmentFailed,
    /// The extractor finished (with or without a value)
    ExtractionCompleted,
    /// Final results were produced
    GradingCompleted,
    /// A generation request finished
    GenerationCompleted,
}

impl AuditEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventKind::AssessmentRequested => "assessment_requested",
            AuditEventKind::AssessmentFailed => "assessment_failed",
            AuditEventKind::ExtractionCompleted => "extraction_completed",
            AuditEventKind::GradingCompleted => "grading_completed",
            AuditEventKind::GenerationCompleted => "generation_completed",
        }
    }
}

/// A structured audit event.
///
/// Each event has a kind and a JSON payload containing event-specific fields.
/// The timestamp is added by the logger when the record is written.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    pub kind: AuditEventKind,
    pub payload: Value,
}

impl AuditEvent {
    pub fn new(kind: AuditEventKind, payload: Value) -> Self {
        Self { kind, payload }
    }
}

/// Port for recording audit events.
///
/// `log` is synchronous and non-fallible so that an audit failure can never
/// block grading; implementations ignore write errors.
pub trait AuditLogger: Send + Sync {
    fn log(&self, event: AuditEvent);
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoAuditLogger;

impl AuditLogger for NoAuditLogger {
    fn log(&self, _event: AuditEvent) {}
}
