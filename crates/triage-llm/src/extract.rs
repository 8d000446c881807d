//! Tolerant JSON extraction from free-text model output.
//!
//! Models wrap JSON in prose, fence it in markdown, or single-quote it.
//! One ordered chain handles all of it so callers see the same parsed
//! value no matter which tier matched.

use serde_json::Value;

/// Extract the first JSON value from model output.
///
/// Tiers, tried in order, first success wins:
/// 1. direct parse of the whole trimmed text;
/// 2. the first ```json fenced block, then the first plain ``` block;
/// 3. the span from the first `{` to the last `}`.
///
/// Each tier retries once with single quotes rewritten to double quotes.
/// Returns `None` when no tier yields valid JSON.
pub fn extract_json(text: &str) -> Option<Value> {
    let trimmed = text.trim().trim_start_matches('\u{feff}');

    if let Some(value) = parse_lenient(trimmed) {
        return Some(value);
    }

    if let Some(block) = fenced_block(trimmed, "```json") {
        if let Some(value) = parse_lenient(block) {
            return Some(value);
        }
    }
    if let Some(block) = fenced_block(trimmed, "```") {
        if let Some(value) = parse_lenient(block) {
            return Some(value);
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            if let Some(value) = parse_lenient(&trimmed[start..=end]) {
                return Some(value);
            }
        }
    }

    None
}

/// Parse as-is, then retry with `'` rewritten to `"` (models sometimes
/// emit Python-style pseudo-JSON).
fn parse_lenient(s: &str) -> Option<Value> {
    serde_json::from_str(s)
        .ok()
        .or_else(|| serde_json::from_str(&s.replace('\'', "\"")).ok())
}

/// Contents of the first fenced block opened by `fence`.
fn fenced_block<'a>(text: &'a str, fence: &str) -> Option<&'a str> {
    let start = text.find(fence)? + fence.len();
    let rest = &text[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}
