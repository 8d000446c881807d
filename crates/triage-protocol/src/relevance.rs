//! Four-way relevance grading of a main query.

use serde::{Deserialize, Serialize};

/// Ordinal relevance grade, A (clearly database-backed) through
/// D (unrelated). `D` is the conservative default for anything the
/// classifier cannot interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

impl Grade {
    /// Reduce a raw model response to a grade: trim, uppercase, take the
    /// first character if it is one of A/B/C/D, otherwise default to `D`.
    pub fn from_response(raw: &str) -> Self {
        match raw.trim().chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('A') => Self::A,
            Some('B') => Self::B,
            Some('C') => Self::C,
            Some('D') => Self::D,
            _ => Self::D,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::A => "answerable from the alarm database",
            Self::B => "likely database-related, needs clarification",
            Self::C => "too vague to classify",
            Self::D => "not database-related",
        }
    }

    /// Suggested next step shown alongside the label. Empty when there is
    /// nothing actionable to suggest.
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::A => "proceed with database retrieval",
            Self::B => "ask the user which device, time range, or alarm type they mean",
            Self::C => "ask the user for a more specific question",
            Self::D => "",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying one main query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelevanceResult {
    /// The query string that was classified (echo of the input).
    pub main_query: String,
    /// Resolved grade, always one of A/B/C/D.
    pub grade: Grade,
    /// Unmodified model output, retained for diagnostics.
    pub raw_response: String,
    /// Display label resolved from the grade.
    pub label: String,
    /// Suggested next step resolved from the grade.
    pub suggestion: String,
}

impl RelevanceResult {
    pub fn new(main_query: impl Into<String>, grade: Grade, raw_response: impl Into<String>) -> Self {
        Self {
            main_query: main_query.into(),
            grade,
            raw_response: raw_response.into(),
            label: grade.label().to_string(),
            suggestion: grade.suggestion().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_response_plain_letters() {
        assert_eq!(Grade::from_response("A"), Grade::A);
        assert_eq!(Grade::from_response("B"), Grade::B);
        assert_eq!(Grade::from_response("C"), Grade::C);
        assert_eq!(Grade::from_response("D"), Grade::D);
    }

    #[test]
    fn from_response_lowercase_and_prose() {
        assert_eq!(Grade::from_response("b) likely database related"), Grade::B);
        assert_eq!(Grade::from_response("  a — clearly related"), Grade::A);
        assert_eq!(Grade::from_response("c"), Grade::C);
    }

    #[test]
    fn from_response_unrecognized_defaults_to_d() {
        assert_eq!(Grade::from_response(""), Grade::D);
        assert_eq!(Grade::from_response("maybe?"), Grade::D);
        assert_eq!(Grade::from_response("E"), Grade::D);
        assert_eq!(Grade::from_response("1. A"), Grade::D);
        assert_eq!(Grade::from_response("無法判斷"), Grade::D);
    }

    #[test]
    fn display_table_is_total() {
        for grade in [Grade::A, Grade::B, Grade::C, Grade::D] {
            assert!(!grade.label().is_empty());
        }
        // D deliberately carries no suggestion
        assert!(Grade::D.suggestion().is_empty());
        assert!(!Grade::A.suggestion().is_empty());
    }

    #[test]
    fn result_carries_derived_display_text() {
        let result = RelevanceResult::new("查詢 LTHDES101N 設備資訊", Grade::A, "A");
        assert_eq!(result.grade, Grade::A);
        assert_eq!(result.label, Grade::A.label());
        assert_eq!(result.suggestion, Grade::A.suggestion());
        assert_eq!(result.raw_response, "A");
    }

    #[test]
    fn grade_serializes_as_letter() {
        assert_eq!(serde_json::to_string(&Grade::C).unwrap(), "\"C\"");
        let back: Grade = serde_json::from_str("\"D\"").unwrap();
        assert_eq!(back, Grade::D);
    }
}
