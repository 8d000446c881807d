//! Segmentation tool — split an utterance by communicative intent.

use async_trait::async_trait;
use serde_json::json;

use triage_llm::{CompletionGateway, extract_json};
use triage_protocol::{SegmentationResult, SentenceLabel, ToolOutcome};

use crate::error::{TriageError, TriageResult};
use crate::prompts::{SEGMENTATION_SYSTEM_PROMPT, segmentation_user_prompt};
use crate::types::TriageTool;

pub const SEGMENTATION_TOOL: &str = "segmentation";

/// User-facing reply when the model output could not be parsed. The
/// failure is non-retried here; the suggestion is aimed at the human.
const PARSE_FAILURE_REPLY: &str =
    "Could not parse the segmentation output. Please retry or rephrase your input.";

pub struct SegmentationTool;

#[async_trait]
impl TriageTool for SegmentationTool {
    fn name(&self) -> &str {
        SEGMENTATION_TOOL
    }

    fn description(&self) -> &str {
        "Split the user input into sentences labeled greeting/main_query/presentation/other. \
         Runs first; when the result contains a main_query, the relevance tool must run next \
         on that exact text."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "Raw user utterance. May be empty."
                }
            },
            "required": ["text"]
        })
    }

    async fn execute(
        &self,
        gateway: &dyn CompletionGateway,
        args: serde_json::Value,
    ) -> ToolOutcome {
        let Some(text) = args["text"].as_str() else {
            return ToolOutcome::failure(
                SEGMENTATION_TOOL,
                "Segmentation needs a 'text' argument.",
                TriageError::MissingArg("text").to_string(),
            );
        };

        // Empty input is forwarded as-is; the model decides what to make of it.
        let raw = gateway
            .complete(SEGMENTATION_SYSTEM_PROMPT, &segmentation_user_prompt(text))
            .await;

        match parse_segmentation(&raw) {
            Ok(result) => {
                let mut reply = format!(
                    "Segmentation complete. main query: {}; greeting: {}; presentation: {}; other sentences: {}.",
                    result.main_query.as_deref().unwrap_or("none"),
                    result.greeting.as_deref().unwrap_or("none"),
                    result.presentation.as_deref().unwrap_or("none"),
                    result.other.len(),
                );
                if let Some(ref main_query) = result.main_query {
                    reply.push_str(&format!(
                        "\nDetected main_query='{main_query}'; run the relevance tool on it next."
                    ));
                }
                ToolOutcome::success(
                    SEGMENTATION_TOOL,
                    reply,
                    json!({ "segmentation_result": result }),
                )
            }
            Err(e) => {
                tracing::warn!(error = %e, raw = %raw, "segmentation output unparseable");
                ToolOutcome::failure(SEGMENTATION_TOOL, PARSE_FAILURE_REPLY, e.to_string())
                    .with_metadata(json!({ "error_type": "segmentation_parse_error" }))
            }
        }
    }
}

/// Parse a raw model response into a `SegmentationResult`.
///
/// A sentence is diverted into `other` when its label is `other`, or when
/// it carries a primary label but its text is not the corresponding
/// top-level primary (a duplicate/secondary occurrence).
fn parse_segmentation(raw: &str) -> TriageResult<SegmentationResult> {
    let value = extract_json(raw).ok_or(TriageError::Parse)?;
    let sentences = value
        .get("sentences")
        .and_then(|v| v.as_array())
        .ok_or(TriageError::Shape)?;

    let field = |name: &str| {
        value
            .get(name)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(String::from)
    };
    let main_query = field("main_query");
    let greeting = field("greeting");
    let presentation = field("presentation");

    let mut result = SegmentationResult {
        main_query,
        greeting,
        presentation,
        ..Default::default()
    };

    for item in sentences {
        let (Some(text), Some(label)) = (
            item.get("text").and_then(|v| v.as_str()),
            item.get("label").and_then(|v| v.as_str()),
        ) else {
            continue;
        };
        if text.is_empty() {
            continue;
        }
        // Unknown labels are skipped, not guessed at.
        let Some(label) = SentenceLabel::parse(label) else {
            continue;
        };

        result.labels.insert(text.to_string(), label);

        let demoted = match label {
            SentenceLabel::Other => true,
            SentenceLabel::MainQuery => result.main_query.as_deref() != Some(text),
            SentenceLabel::Greeting => result.greeting.as_deref() != Some(text),
            SentenceLabel::Presentation => result.presentation.as_deref() != Some(text),
        };
        if demoted {
            result.other.push(text.to_string());
        }
    }

    Ok(result)
}
