//! # Pipeline Orchestration
//!
//! Stage sequencing, parallel team analysis, and the submission/polling
//! boundary. The orchestrator is the single writer of task state; everything
//! else here either feeds it work or reads what it wrote.

pub mod analysis;
pub mod dispatcher;
pub mod pipeline;
pub mod types;

pub use analysis::{AnalysisTask, ParallelAnalysisRunner};
pub use dispatcher::{PipelineDispatcher, SubmissionRequest};
pub use pipeline::PipelineOrchestrator;
pub use types::{HomeSource, PipelineInput, PipelineOutcome, TeamAnalysisOutcome};
