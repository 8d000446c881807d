//! Text completion gateway for the triage pipeline.
//!
//! Provides the `CompletionGateway` trait (an infallible text-in/text-out
//! capability), an OpenAI-compatible HTTP client, the three-tier tolerant
//! JSON extractor for free-text model output, and a scripted mock gateway
//! for tests.

pub mod client;
pub mod config;
pub mod extract;
pub mod mock;

pub use client::{ChatClient, CompletionGateway, FAILURE_PREFIX};
pub use config::LlmConfig;
pub use extract::extract_json;
pub use mock::MockGateway;
