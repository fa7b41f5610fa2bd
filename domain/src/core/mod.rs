//! Core domain concepts shared across all subdomains.
//!
//! - [`question::Question`] - a published exam question and its kind
//! - [`model::Model`] - the hosted model used for qualitative assessment
//! - [`error::DomainError`] - paper construction errors

pub mod error;
pub mod model;
pub mod question;
pub mod text;
