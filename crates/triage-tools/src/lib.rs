//! The two triage stages: utterance segmentation and relevance grading.
//!
//! Tools are a closed interface with exactly two implementations,
//! dispatched by the orchestrator in a fixed order. Execution never
//! fails with an error value; everything the caller needs is data in the
//! returned `ToolOutcome`.

pub mod error;
pub mod prompts;
pub mod relevance;
pub mod reply;
pub mod segmentation;
pub mod types;

pub use error::{TriageError, TriageResult};
pub use relevance::RelevanceTool;
pub use reply::default_reply;
pub use segmentation::SegmentationTool;
pub use types::TriageTool;
