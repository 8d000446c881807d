//! Triage tool error types.
//!
//! These never escape a tool's `execute`; they are rendered into failure
//! outcomes at the tool boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TriageError {
    #[error("missing '{0}' argument")]
    MissingArg(&'static str),

    /// The model output was not JSON under any extraction tier. Gateway
    /// failure strings land here too; the two cases are deliberately not
    /// distinguished.
    #[error("no JSON found in model output")]
    Parse,

    #[error("model output lacks a 'sentences' array")]
    Shape,
}

/// Convenience alias for triage tool results.
pub type TriageResult<T> = Result<T, TriageError>;
