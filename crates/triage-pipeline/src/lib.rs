//! Utterance triage pipeline — orchestration over the two triage tools.
//!
//! Sequences segmentation, conditional relevance grading, and the default
//! reply resolver into a single run that always returns a well-formed
//! trace, whatever the language model did.

pub mod config;
pub mod memory;
pub mod workflow;

pub use config::PipelineConfig;
pub use memory::{FileMemoryLog, MemoryLog, MockMemoryLog, format_entry};
pub use workflow::Workflow;
