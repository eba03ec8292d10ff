//! Grid seeding, trajectory construction and two-frame displacement fields.

pub mod displacement;
pub mod grid;
pub mod trajectory;

pub use displacement::{compute_flow, FlowResult};
pub use grid::seed_grid;
pub use trajectory::{build_trajectories, build_trajectories_reported, TrajectoryResult};

use tracing::debug;

use crate::field::{DisplacementField, FlowVector};
use crate::point::Point2D;

/// How a tracked point was written into a displacement field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VectorKind {
    /// Moved more than the threshold along at least one axis.
    Significant,
    /// Tracked, but within the threshold on both axes.
    Stationary,
    /// The tracker lost the point.
    Lost,
}

/// Record the outcome of tracking `origin` to `dest` at the cell under
/// `origin`. Writes that fall outside the field are dropped.
pub(crate) fn record_vector(
    field: &mut DisplacementField,
    origin: Point2D,
    dest: Point2D,
    valid: bool,
    min_vector_size: f32,
) -> VectorKind {
    let (kind, vector) = if !valid {
        (VectorKind::Lost, FlowVector::lost())
    } else {
        let (dx, dy) = origin.delta_to(&dest);
        if dx.abs() > min_vector_size || dy.abs() > min_vector_size {
            (VectorKind::Significant, FlowVector::new(origin, dx, dy))
        } else {
            (VectorKind::Stationary, FlowVector::stationary(origin))
        }
    };

    if !field.record(origin, vector) {
        debug!(x = origin.x, y = origin.y, "Vector origin outside field, skipped");
    }
    kind
}
