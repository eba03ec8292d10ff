pub mod config;
mod orchestrator;
mod types;

pub use orchestrator::{load_frames, run_pipeline, run_pipeline_reported};
pub use types::{NoOpReporter, PipelineStage, PipelineSummary, ProgressReporter};
