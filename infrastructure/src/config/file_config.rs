//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use gradewise_application::GradingConfig;
use gradewise_domain::Model;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default OpenAI-compatible endpoint (DashScope compatible mode)
pub const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com/compatible-mode/v1";

/// Environment variable consulted for the API key when none is configured
pub const DEFAULT_API_KEY_ENV: &str = "DASHSCOPE_API_KEY";

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("model name cannot be empty")]
    EmptyModelName,

    #[error("provider base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("temperature must be between 0.0 and 2.0, got {0}")]
    InvalidTemperature(f32),

    #[error("max_tokens cannot be 0")]
    InvalidMaxTokens,
}

/// Raw model provider configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Base URL of an OpenAI-compatible chat completions API
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Inline API key (takes precedence over `api_key_env`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model used for assessment and generation
    pub model: Model,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            api_key: None,
            model: Model::default(),
            max_tokens: 2048,
            temperature: 0.3,
        }
    }
}

impl FileProviderConfig {
    /// Inline key if set, otherwise the value of `api_key_env`
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

/// Raw grading configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGradingConfig {
    /// Timeout in seconds for the assessment call
    pub timeout_seconds: Option<u64>,
    /// Path of the JSONL audit log (disabled when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit_log: Option<String>,
}

impl Default for FileGradingConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: Some(120),
            audit_log: None,
        }
    }
}

/// Raw output configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Enable colored terminal output
    pub color: bool,
    /// Show progress indicators
    pub show_progress: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            show_progress: true,
        }
    }
}

/// Complete configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub provider: FileProviderConfig,
    pub grading: FileGradingConfig,
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        // Timeout of 0 seconds doesn't make sense
        if let Some(0) = self.grading.timeout_seconds {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.provider.model.as_str().trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }
        if self.provider.base_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }
        let temperature = self.provider.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigValidationError::InvalidTemperature(temperature));
        }
        if self.provider.max_tokens == 0 {
            return Err(ConfigValidationError::InvalidMaxTokens);
        }
        Ok(())
    }

    /// Use-case configuration derived from this file
    pub fn grading_config(&self) -> GradingConfig {
        GradingConfig::new(self.provider.model.clone())
            .with_optional_timeout(self.grading.timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[provider]
base_url = "http://localhost:8000/v1"
api_key_env = "LOCAL_KEY"
model = "qwen-max"
max_tokens = 4096
temperature = 0.0

[grading]
timeout_seconds = 30
audit_log = "grading.jsonl"

[output]
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.provider.base_url, "http://localhost:8000/v1");
        assert_eq!(config.provider.model.as_str(), "qwen-max");
        assert_eq!(config.provider.max_tokens, 4096);
        assert_eq!(config.grading.audit_log.as_deref(), Some("grading.jsonl"));
        assert!(!config.output.color);
        assert!(config.output.show_progress);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: FileConfig = toml::from_str("[grading]\naudit_log = \"a.jsonl\"").unwrap();
        assert_eq!(config.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.provider.model, Model::default());
        assert_eq!(config.grading.timeout_seconds, Some(120));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = FileConfig::default();
        config.grading.timeout_seconds = Some(0);
        assert_eq!(config.validate(), Err(ConfigValidationError::InvalidTimeout));

        let mut config = FileConfig::default();
        config.provider.temperature = 3.5;
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidTemperature(3.5))
        );

        let mut config = FileConfig::default();
        config.provider.model = Model::new("  ");
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptyModelName));
    }

    #[test]
    fn test_grading_config() {
        let mut config = FileConfig::default();
        config.grading.timeout_seconds = Some(45);
        let grading = config.grading_config();
        assert_eq!(grading.timeout, Some(Duration::from_secs(45)));
        assert_eq!(grading.model, Model::default());
    }

    #[test]
    fn test_inline_api_key_wins() {
        let provider = FileProviderConfig {
            api_key: Some("sk-inline".to_string()),
            api_key_env: "GRADEWISE_TEST_UNSET_KEY_VAR".to_string(),
            ..Default::default()
        };
        assert_eq!(provider.resolve_api_key().as_deref(), Some("sk-inline"));

        let provider = FileProviderConfig {
            api_key_env: "GRADEWISE_TEST_UNSET_KEY_VAR".to_string(),
            ..Default::default()
        };
        assert_eq!(provider.resolve_api_key(), None);
    }
}
