//! Infrastructure layer for gradewise
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, plus configuration and paper file loading.

pub mod config;
pub mod logging;
pub mod openai;
pub mod paper;
pub mod replay;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileGradingConfig, FileOutputConfig,
    FileProviderConfig,
};
pub use logging::JsonlAuditLogger;
pub use openai::{OpenAiConfig, OpenAiGateway};
pub use paper::{LoadedPaper, PaperFile, PaperLoadError, load_paper};
pub use replay::ReplayGateway;
