//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave,
//! such as which model is consulted and how long to wait for it.

use gradewise_domain::Model;
use std::time::Duration;

/// Grading and generation behavior configuration.
#[derive(Debug, Clone, Default)]
pub struct GradingConfig {
    /// Model consulted for assessment and generation
    pub model: Model,
    /// Maximum time to wait for the model before treating the call as a
    /// transport failure.
    pub timeout: Option<Duration>,
}

impl GradingConfig {
    pub fn new(model: Model) -> Self {
        Self {
            model,
            timeout: None,
        }
    }

    /// Creates a GradingConfig with a timeout specified in seconds.
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout = Some(Duration::from_secs(seconds));
        self
    }

    /// Sets the timeout from an optional number of seconds.
    ///
    /// If `seconds` is `None` or zero, no timeout is applied.
    pub fn with_optional_timeout(mut self, seconds: Option<u64>) -> Self {
        self.timeout = seconds.filter(|s| *s > 0).map(Duration::from_secs);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_builders() {
        let config = GradingConfig::default().with_timeout_seconds(30);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));

        let config = config.with_optional_timeout(Some(0));
        assert_eq!(config.timeout, None);

        let config = GradingConfig::new(Model::new("qwen-max")).with_optional_timeout(Some(5));
        assert_eq!(config.model.as_str(), "qwen-max");
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }
}
