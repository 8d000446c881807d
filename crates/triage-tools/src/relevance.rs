//! Relevance tool — grade a main query A through D.

use async_trait::async_trait;
use serde_json::json;

use triage_llm::CompletionGateway;
use triage_protocol::{Grade, RelevanceResult, ToolOutcome};

use crate::prompts::relevance_system_prompt;
use crate::types::TriageTool;

pub const RELEVANCE_TOOL: &str = "relevance";

/// Queries shorter than this (trimmed, in chars) are graded C without a
/// model call.
const MIN_QUERY_CHARS: usize = 2;

pub struct RelevanceTool;

#[async_trait]
impl TriageTool for RelevanceTool {
    fn name(&self) -> &str {
        RELEVANCE_TOOL
    }

    fn description(&self) -> &str {
        "Grade whether a main query maps to a database-backed answer (A/B/C/D). \
         Runs only when segmentation detected a main_query, with that exact text."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The main query sentence to classify."
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(
        &self,
        gateway: &dyn CompletionGateway,
        args: serde_json::Value,
    ) -> ToolOutcome {
        // An absent or non-string "query" deliberately folds into the
        // short-query path below rather than failing like segmentation's
        // missing "text": relevance never fails, and an empty query is
        // just the most degenerate short query.
        let query = args["query"].as_str().unwrap_or("");
        let trimmed = query.trim();

        // Degenerate queries waste a request; grade them C directly.
        if trimmed.chars().count() < MIN_QUERY_CHARS {
            return wrap_result(trimmed, Grade::C, "");
        }

        let raw = gateway
            .complete(&relevance_system_prompt(trimmed), "")
            .await;
        let grade = Grade::from_response(&raw);
        wrap_result(trimmed, grade, &raw)
    }
}

fn wrap_result(query: &str, grade: Grade, raw: &str) -> ToolOutcome {
    let result = RelevanceResult::new(query, grade, raw);
    let reply = format!(
        "Relevance classified: {} ({}); suggested next step: {}",
        result.grade,
        result.label,
        if result.suggestion.is_empty() {
            "none"
        } else {
            result.suggestion.as_str()
        },
    );
    let ui_hint = format!("[{RELEVANCE_TOOL}] {reply}");
    let metadata = serde_json::to_value(&result).unwrap_or(serde_json::Value::Null);
    ToolOutcome::success(RELEVANCE_TOOL, reply, metadata).with_ui_hint(ui_hint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_llm::MockGateway;

    fn decode(outcome: &ToolOutcome) -> RelevanceResult {
        serde_json::from_value(outcome.metadata.clone().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn short_query_short_circuits_to_c() {
        let mock = MockGateway::new();
        let outcome = RelevanceTool.execute(&mock, json!({"query": " 查 "})).await;

        assert_eq!(mock.call_count(), 0, "no gateway call for short queries");
        assert!(outcome.success);
        let result = decode(&outcome);
        assert_eq!(result.grade, Grade::C);
        assert_eq!(result.main_query, "查");
        assert!(result.raw_response.is_empty());
    }

    #[tokio::test]
    async fn empty_and_missing_query_short_circuit() {
        let mock = MockGateway::new();
        let outcome = RelevanceTool.execute(&mock, json!({"query": ""})).await;
        assert_eq!(decode(&outcome).grade, Grade::C);

        let outcome = RelevanceTool.execute(&mock, json!({})).await;
        assert_eq!(decode(&outcome).grade, Grade::C);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn grades_device_query() {
        let mock = MockGateway::new();
        mock.push("A");
        let outcome = RelevanceTool
            .execute(&mock, json!({"query": "查詢 LTHDES101N 設備資訊"}))
            .await;

        assert_eq!(mock.call_count(), 1);
        assert!(outcome.success);
        assert!(outcome.reply.contains("A ("));
        let result = decode(&outcome);
        assert_eq!(result.grade, Grade::A);
        assert_eq!(result.main_query, "查詢 LTHDES101N 設備資訊");
        assert_eq!(result.raw_response, "A");
    }

    #[tokio::test]
    async fn first_valid_letter_wins() {
        let mock = MockGateway::new();
        mock.push("b) likely database related");
        let outcome = RelevanceTool
            .execute(&mock, json!({"query": "告警有什麼異常"}))
            .await;
        assert_eq!(decode(&outcome).grade, Grade::B);
    }

    #[tokio::test]
    async fn garbage_response_defaults_to_d() {
        let mock = MockGateway::new();
        mock.push("I really could not say.");
        let outcome = RelevanceTool
            .execute(&mock, json!({"query": "今天天氣如何"}))
            .await;

        assert!(outcome.success, "classification ambiguity is not an error");
        let result = decode(&outcome);
        assert_eq!(result.grade, Grade::D);
        assert_eq!(result.raw_response, "I really could not say.");
    }

    #[tokio::test]
    async fn gateway_failure_defaults_to_d() {
        let mock = MockGateway::new();
        mock.push("ERROR_CALLING_LLM::request:connection refused");
        let outcome = RelevanceTool
            .execute(&mock, json!({"query": "查詢設備"}))
            .await;

        assert!(outcome.success);
        assert_eq!(decode(&outcome).grade, Grade::D);
    }

    #[tokio::test]
    async fn carries_ui_hint() {
        let mock = MockGateway::new();
        mock.push("C");
        let outcome = RelevanceTool
            .execute(&mock, json!({"query": "那個東西"}))
            .await;
        let hint = outcome.ui_hint.unwrap();
        assert!(hint.starts_with("[relevance]"));
    }
}
