use std::path::PathBuf;

use super::config::PipelineMode;

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Reading,
    Tracking,
    Writing,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reading => write!(f, "Reading frames"),
            Self::Tracking => write!(f, "Tracking points"),
            Self::Writing => write!(f, "Writing output"),
        }
    }
}

/// Thread-safe progress reporting for the pipeline.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new pipeline stage has started. `total_items` is the number of
    /// work items in this stage (e.g., frame transitions), if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// `items_done` work items within the current stage have completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// Progress reporter that ignores every event.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// What a pipeline run produced.
#[derive(Clone, Debug)]
pub struct PipelineSummary {
    pub mode: PipelineMode,
    pub frames: usize,
    pub width: usize,
    pub height: usize,
    /// Grid points seeded on the first frame.
    pub seeded: usize,
    /// Complete trajectories written (trajectory mode only).
    pub complete_trajectories: usize,
    pub significant_vectors: usize,
    /// Files written, in order.
    pub outputs: Vec<PathBuf>,
    /// Why the compensation mask was not produced, if it was requested.
    pub compensation_error: Option<String>,
}
