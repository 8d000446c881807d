//! OpenAI-compatible chat completion client.
//!
//! The gateway contract is infallible: any transport, status, or decoding
//! failure comes back as a text string prefixed with `ERROR_CALLING_LLM::`.
//! Downstream JSON parsing then fails closed instead of the pipeline
//! crashing, and "model unreachable" is indistinguishable from "model
//! produced garbage" by design.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;

/// Stable marker prefixing every gateway failure string.
pub const FAILURE_PREFIX: &str = "ERROR_CALLING_LLM::";

/// An opaque text-completion capability.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Send a system instruction and a user instruction, get generated
    /// text back. Never fails; failures are tagged strings (see
    /// [`FAILURE_PREFIX`]).
    async fn complete(&self, system_instruction: &str, user_instruction: &str) -> String;
}

/// Chat completions request body (OpenAI wire shape).
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat completions response (only the fields we need).
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// HTTP client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct ChatClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl ChatClient {
    pub fn new(config: LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to build reqwest client");
        Self { client, config }
    }
}

#[async_trait]
impl CompletionGateway for ChatClient {
    async fn complete(&self, system_instruction: &str, user_instruction: &str) -> String {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_instruction,
                },
                ChatMessage {
                    role: "user",
                    content: user_instruction,
                },
            ],
            temperature: self.config.temperature,
        };

        let response = match self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = %e, "completion request failed");
                return format!("{FAILURE_PREFIX}request:{e}");
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "completion endpoint returned non-2xx");
            return format!("{FAILURE_PREFIX}status:{status}");
        }

        let chat_resp: ChatResponse = match response.json().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "failed to decode completion response body");
                return format!("{FAILURE_PREFIX}body:{e}");
            }
        };

        match chat_resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
        {
            Some(content) => content.trim().to_string(),
            None => {
                tracing::warn!("completion response carried no choices");
                format!("{FAILURE_PREFIX}empty:no completion choices")
            }
        }
    }
}
