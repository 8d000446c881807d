//! The TriageTool trait.

use async_trait::async_trait;

use triage_llm::CompletionGateway;
use triage_protocol::ToolOutcome;

/// A triage stage. There are exactly two implementations (segmentation,
/// relevance) and the orchestrator runs them in a fixed sequence; this is
/// a closed interface, not a plugin surface.
#[async_trait]
pub trait TriageTool: Send + Sync {
    /// Tool name (e.g. "segmentation").
    fn name(&self) -> &str;

    /// Human-readable description, including when the tool should run.
    fn description(&self) -> &str;

    /// JSON Schema describing accepted arguments.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute with JSON arguments against a completion gateway.
    ///
    /// Never panics and never returns an error value; failures are
    /// recorded in the outcome.
    async fn execute(&self, gateway: &dyn CompletionGateway, args: serde_json::Value)
    -> ToolOutcome;
}
