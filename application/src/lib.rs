//! Application layer for gradewise
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::GradingConfig;
pub use ports::{
    audit_log::{AuditEvent, AuditEventKind, AuditLogger, NoAuditLogger},
    llm_gateway::{GatewayError, LlmGateway, LlmSession},
    progress::{GradingProgressNotifier, NoProgress},
};
pub use use_cases::generate_content::{
    GenerateContentError, GenerateContentUseCase, Generated,
};
pub use use_cases::grade_exam::{GradeExamInput, GradeExamUseCase, GradeReport};
