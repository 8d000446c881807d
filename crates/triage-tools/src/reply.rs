//! Default reply resolver for utterances without a main query.

use triage_protocol::SegmentationResult;

use crate::prompts::{DEFAULT_GREETING_REPLY, DEFAULT_PRESENTATION_REPLY};

/// Resolve the canned reply for a segmentation result.
///
/// Strict priority ladder, first matching branch wins:
/// 1. a main query is present: return empty, the relevance stage answers;
/// 2. only a presentation preference: "not yet supported";
/// 3. a greeting or leftover sentences: greeting/capability message;
/// 4. nothing at all: empty.
///
/// Pure function; same input, same output.
pub fn default_reply(result: &SegmentationResult) -> &'static str {
    if result.main_query.is_some() {
        return "";
    }
    if result.presentation.is_some() {
        return DEFAULT_PRESENTATION_REPLY;
    }
    if result.greeting.is_some() || !result.other.is_empty() {
        return DEFAULT_GREETING_REPLY;
    }
    ""
}
