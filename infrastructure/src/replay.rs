//! Replay gateway: answers every prompt with a recorded model response.
//!
//! Lets a paper be re-graded offline against a saved reply, and gives the
//! CLI a deterministic path for demos.

use async_trait::async_trait;
use gradewise_application::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use gradewise_domain::Model;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub struct ReplayGateway {
    response: Arc<str>,
}

impl ReplayGateway {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: Arc::from(response.into()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, GatewayError> {
        let response = std::fs::read_to_string(path)
            .map_err(|e| GatewayError::Other(format!("{}: {}", path.display(), e)))?;
        info!("Replaying {} bytes from {}", response.len(), path.display());
        Ok(Self::new(response))
    }
}

#[async_trait]
impl LlmGateway for ReplayGateway {
    async fn create_session(&self, model: &Model) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(ReplaySession {
            response: Arc::clone(&self.response),
            model: model.clone(),
        }))
    }

    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        _system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        self.create_session(model).await
    }
}

struct ReplaySession {
    response: Arc<str>,
    model: Model,
}

#[async_trait]
impl LlmSession for ReplaySession {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn send(&self, _content: &str) -> Result<String, GatewayError> {
        Ok(self.response.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_replays_same_text_for_every_prompt() {
        let gateway = ReplayGateway::new("[{\"question_id\": 1, \"score\": 3}]");
        let session = gateway
            .create_session_with_system_prompt(&Model::default(), "grade")
            .await
            .unwrap();

        let first = session.send("a").await.unwrap();
        let second = session.send("b").await.unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("[{"));
    }

    #[tokio::test]
    async fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "recorded reply").unwrap();

        let gateway = ReplayGateway::from_file(file.path()).unwrap();
        let session = gateway.create_session(&Model::new("qwen-max")).await.unwrap();
        assert_eq!(session.model().as_str(), "qwen-max");
        assert_eq!(session.send("prompt").await.unwrap(), "recorded reply");
    }

    #[test]
    fn test_missing_file() {
        let err = ReplayGateway::from_file(Path::new("/nonexistent/reply.txt"))
            .err()
            .unwrap();
        assert!(matches!(err, GatewayError::Other(m) if m.contains("reply.txt")));
    }
}
