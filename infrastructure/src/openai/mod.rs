//! Adapter for OpenAI-compatible chat completion endpoints.
//!
//! DashScope, vLLM, Ollama and OpenAI itself all accept the same
//! `/chat/completions` request, so one gateway covers them.

mod gateway;
mod protocol;

pub use gateway::{OpenAiConfig, OpenAiGateway, OpenAiSession};
pub use protocol::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Role};
