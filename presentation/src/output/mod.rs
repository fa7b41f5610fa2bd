//! Output formatting for grading reports and generated content

pub mod console;
pub mod formatter;
