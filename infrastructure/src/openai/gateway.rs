//! OpenAI-compatible LLM Gateway implementation

use super::protocol::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, error_message};
use crate::config::FileProviderConfig;
use async_trait::async_trait;
use gradewise_application::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use gradewise_domain::Model;
use reqwest::StatusCode;
use std::sync::Arc;
use tracing::{debug, info};

/// Connection settings for an OpenAI-compatible endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl OpenAiConfig {
    pub fn from_provider(provider: &FileProviderConfig) -> Self {
        Self {
            base_url: provider.base_url.trim_end_matches('/').to_string(),
            api_key: provider.resolve_api_key(),
            max_tokens: provider.max_tokens,
            temperature: provider.temperature,
        }
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

struct Inner {
    client: reqwest::Client,
    config: OpenAiConfig,
}

/// LLM Gateway for any endpoint speaking the OpenAI chat completions API
pub struct OpenAiGateway {
    inner: Arc<Inner>,
}

impl OpenAiGateway {
    pub fn new(config: OpenAiConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("gradewise/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        if config.api_key.is_none() {
            info!("No API key configured for {}", config.base_url);
        }
        info!("OpenAiGateway initialized for {}", config.base_url);

        Ok(Self {
            inner: Arc::new(Inner { client, config }),
        })
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.inner.config
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn create_session(&self, model: &Model) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(OpenAiSession {
            inner: Arc::clone(&self.inner),
            model: model.clone(),
            system_prompt: None,
        }))
    }

    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(OpenAiSession {
            inner: Arc::clone(&self.inner),
            model: model.clone(),
            system_prompt: Some(system_prompt.to_string()),
        }))
    }
}

/// A stateless chat session: every `send` is one completion request
pub struct OpenAiSession {
    inner: Arc<Inner>,
    model: Model,
    system_prompt: Option<String>,
}

impl OpenAiSession {
    fn messages(&self, content: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.system_prompt {
            messages.push(ChatMessage::system(system.as_str()));
        }
        messages.push(ChatMessage::user(content));
        messages
    }
}

fn map_transport_error(e: reqwest::Error, base_url: &str) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_connect() {
        GatewayError::ConnectionError(format!("{}: {}", base_url, e))
    } else {
        GatewayError::RequestFailed(e.to_string())
    }
}

fn map_status(status: StatusCode, body: &str, model: &Model) -> GatewayError {
    let message = error_message(body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            GatewayError::AuthenticationFailed(message)
        }
        StatusCode::NOT_FOUND => GatewayError::ModelNotAvailable(format!("{}: {}", model, message)),
        _ => GatewayError::RequestFailed(format!("HTTP {}: {}", status.as_u16(), message)),
    }
}

#[async_trait]
impl LlmSession for OpenAiSession {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn send(&self, content: &str) -> Result<String, GatewayError> {
        let config = &self.inner.config;
        let body = ChatCompletionRequest {
            model: self.model.as_str(),
            messages: self.messages(content),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            stream: false,
        };

        debug!("POST {} ({} prompt bytes)", config.completions_url(), content.len());

        let mut request = self.inner.client.post(config.completions_url()).json(&body);
        if let Some(key) = &config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| map_transport_error(e, &config.base_url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status(status, &body, &self.model));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        parsed
            .into_text()
            .ok_or_else(|| GatewayError::InvalidResponse("response had no message content".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OpenAiConfig {
        OpenAiConfig {
            base_url: "https://llm.example.com/v1/".to_string(),
            api_key: None,
            max_tokens: 256,
            temperature: 0.1,
        }
    }

    #[test]
    fn test_completions_url_joins_once() {
        assert_eq!(
            config().completions_url(),
            "https://llm.example.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_from_provider_trims_base_url() {
        let provider = FileProviderConfig {
            base_url: "http://localhost:11434/v1/".to_string(),
            api_key: Some("sk-test".to_string()),
            ..FileProviderConfig::default()
        };
        let config = OpenAiConfig::from_provider(&provider);
        assert_eq!(config.base_url, "http://localhost:11434/v1");
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_status_mapping() {
        let model = Model::new("qwen-max");
        assert!(matches!(
            map_status(StatusCode::UNAUTHORIZED, r#"{"error": {"message": "bad key"}}"#, &model),
            GatewayError::AuthenticationFailed(m) if m == "bad key"
        ));
        assert!(matches!(
            map_status(StatusCode::NOT_FOUND, "", &model),
            GatewayError::ModelNotAvailable(m) if m.starts_with("qwen-max")
        ));
        assert!(matches!(
            map_status(StatusCode::TOO_MANY_REQUESTS, "slow down", &model),
            GatewayError::RequestFailed(m) if m == "HTTP 429: slow down"
        ));
    }

    #[tokio::test]
    async fn test_session_messages() {
        let gateway = OpenAiGateway::new(config()).unwrap();
        let model = Model::new("qwen-plus");

        let plain = gateway.create_session(&model).await.unwrap();
        assert_eq!(plain.model(), &model);

        let session = OpenAiSession {
            inner: Arc::clone(&gateway.inner),
            model,
            system_prompt: Some("You are a grader".to_string()),
        };
        let messages = session.messages("grade this");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], ChatMessage::system("You are a grader"));
        assert_eq!(messages[1].content, "grade this");
    }
}
