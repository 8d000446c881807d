//! Tool invocation context, outcomes, and per-stage trace entries.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Narrow slice of the hosting framework's request context that the
/// pipeline needs: who is asking, in which conversation, for which request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolContext {
    pub user_id: String,
    pub conversation_id: String,
    pub request_id: Uuid,
}

impl ToolContext {
    /// Build a context with a fresh request id.
    pub fn new(user_id: impl Into<String>, conversation_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            conversation_id: conversation_id.into(),
            request_id: Uuid::new_v4(),
        }
    }
}

/// Result of executing a triage tool.
///
/// Tools never fail with an error value; everything a caller needs to know
/// is carried here as data. On success `reply` is prefixed with the
/// machine marker `<tool_call>{tool_name}</tool_call>` so the hosting
/// agent can tell which tool produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutcome {
    /// Tool that produced this outcome.
    pub tool_name: String,
    /// Whether the tool execution succeeded.
    pub success: bool,
    /// Text payload intended for language-model consumption.
    pub reply: String,
    /// Serialized result object, when the tool produced one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    /// Opaque rendering hint for the hosting UI. Never interpreted here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui_hint: Option<String>,
    /// Error description when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolOutcome {
    pub fn success(
        tool_name: impl Into<String>,
        reply: impl Into<String>,
        metadata: serde_json::Value,
    ) -> Self {
        let tool_name = tool_name.into();
        let reply = format!("<tool_call>{tool_name}</tool_call>\n{}", reply.into());
        Self {
            tool_name,
            success: true,
            reply,
            metadata: Some(metadata),
            ui_hint: None,
            error: None,
        }
    }

    pub fn failure(
        tool_name: impl Into<String>,
        reply: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            reply: reply.into(),
            metadata: None,
            ui_hint: None,
            error: Some(error.into()),
        }
    }

    pub fn with_ui_hint(mut self, hint: impl Into<String>) -> Self {
        self.ui_hint = Some(hint.into());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// One entry in the ordered trace a pipeline run produces.
///
/// Entries are appended strictly in execution order and never mutated; a
/// failed stage is the last entry of its run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageOutcome {
    pub stage: String,
    pub success: bool,
    pub message: String,
}

impl StageOutcome {
    pub fn from_outcome(outcome: &ToolOutcome) -> Self {
        Self {
            stage: outcome.tool_name.clone(),
            success: outcome.success,
            message: outcome.reply.clone(),
        }
    }

    pub fn failed(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            success: false,
            message: message.into(),
        }
    }

    /// Render the caller-visible trace line.
    pub fn render(&self) -> String {
        format!(
            "<tool_call name=\"{}\">success={}; msg={}</tool_call>",
            self.stage, self.success, self.message
        )
    }
}
