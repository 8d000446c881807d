//! Shared types for the utterance triage pipeline.
//!
//! Value objects exchanged between the triage tools and the orchestrator:
//! segmentation results, relevance grades, tool outcomes, and per-stage
//! trace entries. Everything here is serde-serializable and immutable
//! after construction.

pub mod outcome;
pub mod relevance;
pub mod segmentation;

pub use outcome::{StageOutcome, ToolContext, ToolOutcome};
pub use relevance::{Grade, RelevanceResult};
pub use segmentation::{SegmentationResult, SentenceLabel};
