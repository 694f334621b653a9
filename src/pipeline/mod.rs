//! Icon generation pipeline
//!
//! - **state**: pipeline states, run outcome and report
//! - **orchestrator**: the state machine sequencing validation, cache
//!   lookups, rendering, packing and promotion

pub mod orchestrator;
pub mod state;

pub use orchestrator::{IconPipeline, PipelineSettings};
pub use state::{PipelineReport, PipelineStatus, RunOutcome};
