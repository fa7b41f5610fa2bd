//! Wire types for OpenAI-compatible chat completion endpoints.
//!
//! Only the subset gradewise needs: a non-streaming request with a system
//! and a user message, and the first choice of the response.

use serde::{Deserialize, Serialize};

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// `POST /chat/completions` body
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub stream: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    /// Some providers send `null` content for refusals
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if the provider returned one
    pub fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
    }
}

/// Error envelope returned with non-success statuses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub message: String,
}

/// Best-effort message from an error body, falling back to the raw text
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|parsed| parsed.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let request = ChatCompletionRequest {
            model: "qwen-plus",
            messages: vec![ChatMessage::system("grade"), ChatMessage::user("[...]")],
            max_tokens: 2048,
            temperature: 0.5,
            stream: false,
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "qwen-plus");
        assert_eq!(value["messages"][0], json!({"role": "system", "content": "grade"}));
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["stream"], false);
        assert_eq!(value["temperature"], 0.5);
    }

    #[test]
    fn test_response_first_choice() {
        let body = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "[{\"question_id\": 1}]"}},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
            ],
            "usage": {"total_tokens": 12}
        }"#;
        let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.into_text().unwrap(), r#"[{"question_id": 1}]"#);
    }

    #[test]
    fn test_response_without_text() {
        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(empty.into_text().is_none());

        let null: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert!(null.into_text().is_none());
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(r#"{"error": {"message": "Invalid API key", "code": "invalid_api_key"}}"#),
            "Invalid API key"
        );
        assert_eq!(error_message("  Bad Gateway \n"), "Bad Gateway");
    }
}
