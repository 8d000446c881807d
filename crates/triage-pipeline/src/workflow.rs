//! Pipeline orchestrator.
//!
//! One run walks START -> SEGMENTED -> (CLASSIFIED | DEFAULTED) -> DONE,
//! with a failure in either tool stage short-circuiting the rest. Every
//! terminal return is the rendered trace, the final message, then the
//! memory log tail, in that order. Callers depend on the ordering.

use serde_json::json;
use std::sync::Arc;

use triage_llm::CompletionGateway;
use triage_protocol::{RelevanceResult, SegmentationResult, StageOutcome, ToolContext, ToolOutcome};
use triage_tools::{RelevanceTool, SegmentationTool, TriageTool, default_reply};

use crate::memory::MemoryLog;

/// Stage name used for orchestrator-level (operational) failures.
const PIPELINE_STAGE: &str = "pipeline";

pub struct Workflow {
    gateway: Arc<dyn CompletionGateway>,
    memory: Arc<dyn MemoryLog>,
    segmentation: SegmentationTool,
    relevance: RelevanceTool,
    tail_lines: usize,
}

impl Workflow {
    pub fn new(
        gateway: Arc<dyn CompletionGateway>,
        memory: Arc<dyn MemoryLog>,
        tail_lines: usize,
    ) -> Self {
        Self {
            gateway,
            memory,
            segmentation: SegmentationTool,
            relevance: RelevanceTool,
            tail_lines,
        }
    }

    /// Run the full pipeline over one utterance.
    ///
    /// Never fails: every stage failure is converted into trace data and a
    /// user-facing message.
    pub async fn run(&self, ctx: &ToolContext, utterance: &str) -> String {
        tracing::info!(
            conversation = %ctx.conversation_id,
            request = %ctx.request_id,
            user = %ctx.user_id,
            "pipeline run started"
        );

        let mut trace: Vec<StageOutcome> = Vec::new();

        // Stage 1: segmentation.
        let outcome = self
            .segmentation
            .execute(self.gateway.as_ref(), json!({ "text": utterance }))
            .await;
        trace.push(StageOutcome::from_outcome(&outcome));

        if !outcome.success {
            return self.finish(trace, outcome.reply).await;
        }

        let segmentation = match decode_metadata::<SegmentationResult>(
            &outcome,
            Some("segmentation_result"),
        ) {
            Ok(result) => result,
            Err(e) => return self.operational_failure(trace, e).await,
        };

        // Stage 2: relevance when a main query exists, canned reply otherwise.
        let final_message = if let Some(ref main_query) = segmentation.main_query {
            let outcome = self
                .relevance
                .execute(self.gateway.as_ref(), json!({ "query": main_query }))
                .await;
            trace.push(StageOutcome::from_outcome(&outcome));

            if !outcome.success {
                return self.finish(trace, outcome.reply).await;
            }

            let relevance = match decode_metadata::<RelevanceResult>(&outcome, None) {
                Ok(result) => result,
                Err(e) => return self.operational_failure(trace, e).await,
            };
            format!(
                "Relevance verdict: {} ({}) -> suggestion: {}",
                relevance.grade,
                relevance.label,
                if relevance.suggestion.is_empty() {
                    "none"
                } else {
                    relevance.suggestion.as_str()
                },
            )
        } else {
            default_reply(&segmentation).to_string()
        };

        self.finish(trace, final_message).await
    }

    /// Record an orchestrator-level failure and short-circuit. Nothing is
    /// allowed to unwind past `run`.
    async fn operational_failure(&self, mut trace: Vec<StageOutcome>, error: String) -> String {
        tracing::error!(error = %error, "pipeline stage failed operationally");
        trace.push(StageOutcome::failed(
            PIPELINE_STAGE,
            format!("internal error: {error}"),
        ));
        self.finish(trace, "An internal error occurred; please retry.".to_string())
            .await
    }

    /// Assemble the terminal return value: trace lines, final message,
    /// memory tail. Fixed order.
    ///
    /// Conversation persistence is disabled upstream, so nothing is
    /// appended here; the tail stays as a diagnostic hook.
    async fn finish(&self, trace: Vec<StageOutcome>, final_message: String) -> String {
        let tail = self.memory.tail(self.tail_lines).await;
        let mut parts: Vec<String> = trace.iter().map(StageOutcome::render).collect();
        parts.push(final_message);
        parts.push(format!("\n[recent memory]\n{tail}"));
        parts.join("\n")
    }
}

/// Pull a typed result back out of a tool outcome's metadata. `key`
/// selects a nested object; `None` decodes the metadata itself.
fn decode_metadata<T: serde::de::DeserializeOwned>(
    outcome: &ToolOutcome,
    key: Option<&str>,
) -> Result<T, String> {
    let metadata = outcome
        .metadata
        .as_ref()
        .ok_or_else(|| format!("'{}' outcome carried no metadata", outcome.tool_name))?;
    let value = match key {
        None => metadata.clone(),
        Some(key) => metadata
            .get(key)
            .cloned()
            .ok_or_else(|| format!("'{}' metadata lacks '{key}'", outcome.tool_name))?,
    };
    serde_json::from_value(value).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_llm::MockGateway;

    use crate::memory::MockMemoryLog;

    fn workflow(mock: Arc<MockGateway>) -> Workflow {
        Workflow::new(mock, Arc::new(MockMemoryLog::new()), 10)
    }

    fn workflow_with_memory(mock: Arc<MockGateway>, memory: MockMemoryLog) -> Workflow {
        Workflow::new(mock, Arc::new(memory), 10)
    }

    fn ctx() -> ToolContext {
        ToolContext::new("demo", "demo_conversation")
    }

    const GREETING_ONLY: &str = r#"{"sentences": [{"text": "你好", "label": "greeting"}], "main_query": null, "greeting": "你好", "presentation": null}"#;

    const DEVICE_QUERY: &str = r#"{"sentences": [
        {"text": "查詢 LTHDES101N 設備資訊", "label": "main_query"}
    ], "main_query": "查詢 LTHDES101N 設備資訊", "greeting": null, "presentation": null}"#;

    #[tokio::test]
    async fn greeting_takes_the_default_reply_path() {
        let mock = Arc::new(MockGateway::new());
        mock.push(GREETING_ONLY);
        let workflow = workflow(mock.clone());

        let reply = workflow.run(&ctx(), "你好").await;

        // Relevance never invoked
        assert_eq!(mock.call_count(), 1);
        assert!(reply.contains("<tool_call name=\"segmentation\">success=true"));
        assert!(!reply.contains("name=\"relevance\""));
        assert!(reply.contains("ALS alarm management assistant"));
        assert!(reply.contains("[recent memory]"));
    }

    #[tokio::test]
    async fn device_query_runs_both_stages() {
        let mock = Arc::new(MockGateway::new());
        mock.push(DEVICE_QUERY);
        mock.push("A");
        let workflow = workflow(mock.clone());

        let reply = workflow.run(&ctx(), "查詢 LTHDES101N 設備資訊").await;

        assert_eq!(mock.call_count(), 2);
        assert!(reply.contains("<tool_call name=\"segmentation\">success=true"));
        assert!(reply.contains("<tool_call name=\"relevance\">success=true"));
        assert!(reply.contains("Relevance verdict: A ("));
        assert!(reply.contains("suggestion: proceed with database retrieval"));
    }

    #[tokio::test]
    async fn segmentation_failure_short_circuits() {
        let mock = Arc::new(MockGateway::new());
        mock.push("no JSON here, just prose");
        let workflow = workflow(mock.clone());

        let reply = workflow.run(&ctx(), "查詢設備").await;

        assert_eq!(mock.call_count(), 1, "relevance must not run");
        assert!(reply.contains("<tool_call name=\"segmentation\">success=false"));
        assert!(reply.contains("Could not parse the segmentation output"));
        assert!(reply.contains("[recent memory]"));
    }

    #[tokio::test]
    async fn gateway_failure_string_short_circuits() {
        let mock = Arc::new(MockGateway::new());
        mock.push("ERROR_CALLING_LLM::request:connection refused");
        let workflow = workflow(mock.clone());

        let reply = workflow.run(&ctx(), "查詢設備").await;
        assert!(reply.contains("success=false"));
        assert!(!reply.contains("name=\"relevance\""));
    }

    #[tokio::test]
    async fn trace_precedes_final_message_precedes_tail() {
        let mock = Arc::new(MockGateway::new());
        mock.push(GREETING_ONLY);
        let memory = MockMemoryLog::with_lines(vec!["old entry".into()]);
        let workflow = workflow_with_memory(mock, memory);

        let reply = workflow.run(&ctx(), "你好").await;

        let trace_pos = reply.find("<tool_call name=").unwrap();
        let message_pos = reply.find("ALS alarm management assistant").unwrap();
        let tail_pos = reply.find("[recent memory]").unwrap();
        let entry_pos = reply.find("old entry").unwrap();
        assert!(trace_pos < message_pos);
        assert!(message_pos < tail_pos);
        assert!(tail_pos < entry_pos);
    }

    #[tokio::test]
    async fn ambiguous_grade_still_completes() {
        let mock = Arc::new(MockGateway::new());
        mock.push(DEVICE_QUERY);
        mock.push("no idea what this is");
        let workflow = workflow(mock);

        let reply = workflow.run(&ctx(), "查詢 LTHDES101N 設備資訊").await;
        assert!(reply.contains("Relevance verdict: D ("));
        assert!(reply.contains("suggestion: none"));
    }

    #[tokio::test]
    async fn presentation_only_gets_canned_reply() {
        let mock = Arc::new(MockGateway::new());
        mock.push(
            r#"{"sentences": [{"text": "用折線圖呈現", "label": "presentation"}], "main_query": null, "greeting": null, "presentation": "用折線圖呈現"}"#,
        );
        let workflow = workflow(mock.clone());

        let reply = workflow.run(&ctx(), "用折線圖呈現").await;
        assert_eq!(mock.call_count(), 1);
        assert!(reply.contains("Chart rendering is not available yet"));
    }

    #[tokio::test]
    async fn empty_segmentation_yields_empty_final_message() {
        let mock = Arc::new(MockGateway::new());
        mock.push(r#"{"sentences": [], "main_query": null, "greeting": null, "presentation": null}"#);
        let workflow = workflow(mock);

        let reply = workflow.run(&ctx(), "").await;
        // Trace line, empty final message, then the tail block.
        assert!(reply.contains("success=true"));
        assert!(reply.contains("\n\n\n[recent memory]\n"));
    }

    #[tokio::test]
    async fn operational_failure_ends_trace_with_failed_pipeline_stage() {
        let outcome = ToolOutcome::success("segmentation", "ok", json!({}));
        let trace = vec![StageOutcome::from_outcome(&outcome)];
        let workflow = workflow(Arc::new(MockGateway::new()));

        let reply = workflow
            .operational_failure(trace, "missing field `grade`".to_string())
            .await;

        assert!(reply.contains("<tool_call name=\"segmentation\">success=true"));
        assert!(reply.contains(
            "<tool_call name=\"pipeline\">success=false; msg=internal error: missing field `grade`</tool_call>"
        ));
        assert!(reply.contains("An internal error occurred; please retry."));
        // Failed pipeline stage, then the message, then the tail block.
        let stage_pos = reply.find("name=\"pipeline\"").unwrap();
        let message_pos = reply.find("An internal error occurred").unwrap();
        let tail_pos = reply.find("[recent memory]").unwrap();
        assert!(stage_pos < message_pos);
        assert!(message_pos < tail_pos);
    }

    #[test]
    fn decode_metadata_missing_metadata() {
        let outcome = ToolOutcome::failure("segmentation", "x", "y");
        let err =
            decode_metadata::<SegmentationResult>(&outcome, Some("segmentation_result"))
                .unwrap_err();
        assert!(err.contains("carried no metadata"));
    }

    #[test]
    fn decode_metadata_missing_key() {
        let outcome = ToolOutcome::success("segmentation", "ok", json!({"something_else": 1}));
        let err =
            decode_metadata::<SegmentationResult>(&outcome, Some("segmentation_result"))
                .unwrap_err();
        assert!(err.contains("lacks 'segmentation_result'"));
    }

    #[test]
    fn decode_metadata_type_mismatch() {
        let outcome = ToolOutcome::success(
            "segmentation",
            "ok",
            json!({"segmentation_result": {"labels": "not a map"}}),
        );
        let err =
            decode_metadata::<SegmentationResult>(&outcome, Some("segmentation_result"))
                .unwrap_err();
        assert!(err.contains("invalid type"));
    }

    #[test]
    fn decode_metadata_whole_value() {
        use triage_protocol::Grade;

        let result = RelevanceResult::new("查詢設備", Grade::A, "A");
        let outcome = ToolOutcome::success(
            "relevance",
            "ok",
            serde_json::to_value(&result).unwrap(),
        );
        let back = decode_metadata::<RelevanceResult>(&outcome, None).unwrap();
        assert_eq!(back.grade, Grade::A);
        assert_eq!(back.main_query, "查詢設備");
    }

    #[tokio::test]
    async fn concurrent_runs_share_nothing() {
        let mock_a = Arc::new(MockGateway::new());
        mock_a.push(GREETING_ONLY);
        let mock_b = Arc::new(MockGateway::new());
        mock_b.push(DEVICE_QUERY);
        mock_b.push("B");

        let wf_a = workflow(mock_a);
        let wf_b = workflow(mock_b);
        let ctx_a = ctx();
        let ctx_b = ctx();
        let (a, b) = tokio::join!(wf_a.run(&ctx_a, "你好"), wf_b.run(&ctx_b, "查警報"));

        assert!(a.contains("ALS alarm management assistant"));
        assert!(b.contains("Relevance verdict: B ("));
    }
}
