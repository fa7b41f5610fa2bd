//! Model value object naming the hosted LLM that performs assessment

use serde::{Deserialize, Serialize};

/// Model used when neither configuration nor CLI names one
pub const DEFAULT_MODEL: &str = "qwen-plus";

/// Identifier of a hosted chat model (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Model(String);

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Model {
    fn default() -> Self {
        Self(DEFAULT_MODEL.to_string())
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Model {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            Err("model name cannot be empty".to_string())
        } else {
            Ok(Self(name.to_string()))
        }
    }
}
