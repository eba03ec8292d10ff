//! Multi-frame trajectory construction.
//!
//! Every seeded grid point owns one slot in three parallel arrays: its
//! current tracked position, its trajectory, and (per transition) the
//! tracker's validity flag. Slots are never removed, so index `i` names the
//! same point from the first frame to the last.
//!
//! Per transition and slot:
//! - valid and strictly inside the border band: append to the trajectory and
//!   carry the new position forward;
//! - valid but inside the border band: carry the new position forward without
//!   appending;
//! - invalid: keep the previous position and do not append.
//!
//! A trajectory that misses one append can never reach one point per frame,
//! so only points followed cleanly through the whole sequence are returned.

use tracing::{debug, info};

use crate::error::Result;
use crate::field::DisplacementField;
use crate::frame::{ensure_uniform_dimensions, Frame};
use crate::pipeline::config::FlowConfig;
use crate::pipeline::{NoOpReporter, PipelineStage, ProgressReporter};
use crate::point::{PointSet, Trajectory};
use crate::track::PointTracker;

use super::grid::seed_grid;
use super::{record_vector, VectorKind};

/// Output of [`build_trajectories`].
#[derive(Clone, Debug)]
pub struct TrajectoryResult {
    /// Complete trajectories, in seed order.
    pub trajectories: Vec<Trajectory>,
    /// Displacement recorded at the final transition.
    pub field: DisplacementField,
    /// Number of final-transition vectors above the motion threshold.
    pub significant_vectors: usize,
    /// Number of grid points seeded on the first frame.
    pub seeded: usize,
}

/// Track a grid of points through `frames` and keep the trajectories that
/// survive every transition.
pub fn build_trajectories(
    frames: &[Frame],
    config: &FlowConfig,
    tracker: &dyn PointTracker,
) -> Result<TrajectoryResult> {
    build_trajectories_reported(frames, config, tracker, &NoOpReporter)
}

/// [`build_trajectories`] with per-transition progress reporting.
pub fn build_trajectories_reported(
    frames: &[Frame],
    config: &FlowConfig,
    tracker: &dyn PointTracker,
    reporter: &dyn ProgressReporter,
) -> Result<TrajectoryResult> {
    config.validate()?;
    let (width, height) = ensure_uniform_dimensions(frames)?;
    let frame_count = frames.len();
    let transitions = frame_count - 1;

    let mut points: PointSet = seed_grid(width, height, config.pixel_step)?;
    let mut trajectories: Vec<Trajectory> = points.iter().copied().map(Trajectory::start).collect();
    let mut field = DisplacementField::new(width, height);
    let mut significant_vectors = 0;

    info!(
        frames = frame_count,
        points = points.len(),
        tracker = tracker.name(),
        "Building trajectories"
    );

    reporter.begin_stage(PipelineStage::Tracking, Some(transitions));
    for (k, pair) in frames.windows(2).enumerate() {
        let output = tracker.track(&pair[0], &pair[1], &points)?;
        output.ensure_aligned(points.len())?;

        let is_final = k + 1 == transitions;
        let mut appended = 0usize;
        for (i, (&dest, &valid)) in output.points.iter().zip(&output.valid).enumerate() {
            if is_final
                && record_vector(&mut field, points[i], dest, valid, config.min_vector_size)
                    == VectorKind::Significant
            {
                significant_vectors += 1;
            }

            if !valid {
                continue;
            }
            if dest.is_inside(width, height, config.border_margin) {
                trajectories[i].push(dest);
                appended += 1;
            }
            points[i] = dest;
        }

        debug!(
            transition = k,
            valid = output.valid_count(),
            appended,
            "Transition tracked"
        );
        reporter.advance(k + 1);
    }
    reporter.finish_stage();

    let seeded = trajectories.len();
    let trajectories: Vec<Trajectory> = trajectories
        .into_iter()
        .filter(|t| t.is_complete(frame_count))
        .collect();

    info!(
        seeded,
        complete = trajectories.len(),
        significant_vectors,
        "Trajectories built"
    );

    Ok(TrajectoryResult {
        trajectories,
        field,
        significant_vectors,
        seeded,
    })
}
