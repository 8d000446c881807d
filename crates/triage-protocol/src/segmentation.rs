//! Sentence-level segmentation of a user utterance.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Communicative category assigned to a single sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentenceLabel {
    Greeting,
    MainQuery,
    Presentation,
    Other,
}

impl SentenceLabel {
    /// Parse a label string as produced by the language model.
    /// Unknown labels return `None` and the sentence is skipped upstream.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "greeting" => Some(Self::Greeting),
            "main_query" => Some(Self::MainQuery),
            "presentation" => Some(Self::Presentation),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::MainQuery => "main_query",
            Self::Presentation => "presentation",
            Self::Other => "other",
        }
    }
}

/// Structured segmentation of one utterance.
///
/// At most one sentence is treated as the primary `main_query`, `greeting`
/// and `presentation`; additional sentences carrying those labels are
/// demoted into `other`. When a primary field is set, its text equals one
/// of the keys in `labels`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentationResult {
    /// Sentence text → category label, one entry per sentence.
    pub labels: HashMap<String, SentenceLabel>,
    /// The single sentence expressing retrievable query intent, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_query: Option<String>,
    /// The greeting sentence, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
    /// The sentence describing desired output formatting, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presentation: Option<String>,
    /// Sentences labeled `other`, plus demoted secondary occurrences of
    /// the primary categories, in model output order.
    #[serde(default)]
    pub other: Vec<String>,
}
