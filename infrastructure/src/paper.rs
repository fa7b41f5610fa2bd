//! Submitted paper files.
//!
//! A paper file is JSON holding the published questions and, optionally,
//! the learner's answers:
//!
//! ```json
//! {
//!   "questions": [
//!     {"id": 1, "type": "multiple_choice", "question_text": "...",
//!      "options": ["A. ...", "B. ..."], "answer": "B", "score": 5}
//!   ],
//!   "answers": [{"question_id": 1, "student_answer": "b"}]
//! }
//! ```

use gradewise_domain::{DomainError, ExamPaper, Question, SubmissionAnswer};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum PaperLoadError {
    #[error("Could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid paper: {0}")]
    Invalid(#[from] DomainError),
}

/// Raw contents of a paper file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaperFile {
    pub questions: Vec<Question>,
    #[serde(default)]
    pub answers: Vec<SubmissionAnswer>,
}

/// A validated paper with the answers submitted against it
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPaper {
    pub paper: ExamPaper,
    pub answers: Vec<SubmissionAnswer>,
}

impl PaperFile {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Validate the questions and check that every answer targets one of them.
    pub fn into_paper(self) -> Result<LoadedPaper, PaperLoadError> {
        let paper = ExamPaper::new(self.questions)?;
        if let Some(stray) = self
            .answers
            .iter()
            .find(|answer| paper.get(answer.question_id).is_none())
        {
            return Err(DomainError::UnknownQuestion(stray.question_id).into());
        }
        Ok(LoadedPaper {
            paper,
            answers: self.answers,
        })
    }
}

/// Read, parse and validate the paper file at `path`.
pub fn load_paper(path: &Path) -> Result<LoadedPaper, PaperLoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| PaperLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file = PaperFile::from_json(&text).map_err(|source| PaperLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        "Loaded {} questions and {} answers from {}",
        file.questions.len(),
        file.answers.len(),
        path.display()
    );
    file.into_paper()
}
