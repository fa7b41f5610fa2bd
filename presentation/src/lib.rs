//! Presentation layer for gradewise
//!
//! This crate contains CLI definitions, output formatters
//! and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, GenerateCommand, GenerateOptions, GradeArgs, OutputFormat};
pub use output::console::{ConsoleFormatter, JsonFormatter, set_color};
pub use output::formatter::OutputFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
