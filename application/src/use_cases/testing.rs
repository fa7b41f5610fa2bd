//! Scripted gateway shared by the use-case tests

use crate::ports::audit_log::{AuditEvent, AuditLogger};
use crate::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use async_trait::async_trait;
use gradewise_domain::Model;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Script = Arc<Mutex<VecDeque<Result<String, GatewayError>>>>;

/// Gateway whose sessions pop canned replies and record every prompt
pub struct ScriptedGateway {
    replies: Script,
    pub prompts: Arc<Mutex<Vec<String>>>,
    pub system_prompts: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl ScriptedGateway {
    pub fn new(replies: Vec<Result<String, GatewayError>>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from(replies))),
            prompts: Arc::new(Mutex::new(Vec::new())),
            system_prompts: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    pub fn failing(error: GatewayError) -> Self {
        Self::new(vec![Err(error)])
    }

    /// Sleep before every reply (use with paused tokio time)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn sent_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

struct ScriptedSession {
    model: Model,
    replies: Script,
    prompts: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
}

#[async_trait]
impl LlmSession for ScriptedSession {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn send(&self, content: &str) -> Result<String, GatewayError> {
        self.prompts.lock().unwrap().push(content.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Other("No more responses".to_string())))
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn create_session(&self, model: &Model) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(ScriptedSession {
            model: model.clone(),
            replies: Arc::clone(&self.replies),
            prompts: Arc::clone(&self.prompts),
            delay: self.delay,
        }))
    }

    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        self.system_prompts
            .lock()
            .unwrap()
            .push(system_prompt.to_string());
        self.create_session(model).await
    }
}

/// Audit logger that keeps every event in memory
#[derive(Default)]
pub struct RecordingAuditLogger {
    pub events: Mutex<Vec<AuditEvent>>,
}

impl RecordingAuditLogger {
    pub fn kinds(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.kind.as_str())
            .collect()
    }
}

impl AuditLogger for RecordingAuditLogger {
    fn log(&self, event: AuditEvent) {
        self.events.lock().unwrap().push(event);
    }
}
