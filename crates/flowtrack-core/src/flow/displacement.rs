//! Two-frame dense displacement with optional background compensation.

use tracing::{info, warn};

use crate::compensation::{compensate_motion, PerspectiveModel};
use crate::error::{FlowTrackError, Result};
use crate::field::DisplacementField;
use crate::frame::Frame;
use crate::pipeline::config::FlowConfig;
use crate::point::Point2D;
use crate::track::PointTracker;

use super::grid::seed_grid;
use super::{record_vector, VectorKind};

/// Output of [`compute_flow`].
#[derive(Debug)]
pub struct FlowResult {
    pub field: DisplacementField,
    /// Number of vectors above the motion threshold.
    pub significant_vectors: usize,
    /// Binary mask of motion inconsistent with the dominant perspective
    /// motion. `None` when compensation is disabled; an error here does not
    /// invalidate `field`.
    pub compensation: Option<Result<Frame>>,
}

impl FlowResult {
    /// The compensation mask, if it was computed successfully.
    pub fn mask(&self) -> Option<&Frame> {
        self.compensation.as_ref().and_then(|r| r.as_ref().ok())
    }
}

/// Track a grid seeded on `first` into `second` and record one vector per
/// grid point.
///
/// Significant vectors double as correspondences for the perspective fit
/// that drives background compensation.
pub fn compute_flow(
    first: &Frame,
    second: &Frame,
    config: &FlowConfig,
    tracker: &dyn PointTracker,
    model: &dyn PerspectiveModel,
) -> Result<FlowResult> {
    config.validate()?;
    let (width, height) = first.dimensions();
    if second.dimensions() != (width, height) {
        return Err(FlowTrackError::DimensionMismatch {
            index: 1,
            expected_width: width,
            expected_height: height,
            width: second.width(),
            height: second.height(),
        });
    }

    let points = seed_grid(width, height, config.pixel_step)?;
    let output = tracker.track(first, second, &points)?;
    output.ensure_aligned(points.len())?;

    let mut field = DisplacementField::new(width, height);
    let mut src_points: Vec<Point2D> = Vec::new();
    let mut dst_points: Vec<Point2D> = Vec::new();

    for ((&origin, &dest), &valid) in points.iter().zip(&output.points).zip(&output.valid) {
        if record_vector(&mut field, origin, dest, valid, config.min_vector_size)
            == VectorKind::Significant
        {
            src_points.push(origin);
            dst_points.push(dest);
        }
    }

    let significant_vectors = src_points.len();
    info!(
        points = points.len(),
        valid = output.valid_count(),
        significant_vectors,
        "Displacement field computed"
    );

    let compensation = if config.compensation.enabled {
        let mask = compensate_motion(
            first,
            second,
            &src_points,
            &dst_points,
            config.compensation.threshold,
            model,
        );
        if let Err(ref e) = mask {
            warn!(error = %e, "Background compensation skipped");
        }
        Some(mask)
    } else {
        None
    };

    Ok(FlowResult {
        field,
        significant_vectors,
        compensation,
    })
}
