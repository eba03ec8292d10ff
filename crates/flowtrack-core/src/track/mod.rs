//! Point tracking between two grayscale frames.
//!
//! The trajectory and displacement builders only see the [`PointTracker`]
//! trait, so any tracker (or a scripted one in tests) can be plugged in.

pub mod lucas_kanade;
pub mod pyramid;
pub mod sampling;

pub use lucas_kanade::PyramidalLk;

use crate::error::{FlowTrackError, Result};
use crate::frame::Frame;
use crate::point::Point2D;

/// Result of tracking a point set from one frame into the next.
///
/// `points[i]` and `valid[i]` both refer to the i-th input point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackOutput {
    pub points: Vec<Point2D>,
    pub valid: Vec<bool>,
}

impl TrackOutput {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn valid_count(&self) -> usize {
        self.valid.iter().filter(|&&v| v).count()
    }

    /// Fail unless there is exactly one point and one flag per input.
    pub fn ensure_aligned(&self, inputs: usize) -> Result<()> {
        if self.points.len() != inputs || self.valid.len() != inputs {
            return Err(FlowTrackError::TrackerFailure(format!(
                "tracker returned {} points and {} flags for {} inputs",
                self.points.len(),
                self.valid.len(),
                inputs
            )));
        }
        Ok(())
    }
}

/// Maps points in `prev` to their positions in `next`.
///
/// Implementations must return exactly one output point and one validity
/// flag per input point, in input order. Individual tracking failures are
/// reported through the flags; `Err` is reserved for inputs the tracker
/// cannot process at all.
pub trait PointTracker: Send + Sync {
    fn track(&self, prev: &Frame, next: &Frame, points: &[Point2D]) -> Result<TrackOutput>;

    fn name(&self) -> &str {
        "custom"
    }
}
