//! Gateway configuration, loadable from TOML.

use serde::Deserialize;

/// Configuration for the OpenAI-compatible completion endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the endpoint, including the API version prefix
    /// (e.g. `http://localhost:11434/v1`).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model to use for completions.
    #[serde(default = "default_model")]
    pub model: String,
    /// Bearer token. Local endpoints usually ignore it.
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// Sampling temperature. 0.0 keeps classification output stable.
    #[serde(default)]
    pub temperature: f64,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:11434/v1".into()
}
fn default_model() -> String {
    "qwen2.5:7b".into()
}
fn default_api_key() -> String {
    "none".into()
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: default_api_key(),
            temperature: 0.0,
            timeout_secs: default_timeout_secs(),
        }
    }
}
