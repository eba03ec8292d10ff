//! Background-motion compensation.
//!
//! The dominant (camera) motion between two frames is modeled as a single
//! perspective transform fitted to the tracked correspondences. The first
//! frame is warped through it and compared with the second; pixels whose
//! absolute difference exceeds a fixed threshold mark independent motion.

pub mod homography;
pub mod warp;

pub use homography::{fit_homography, Homography};
pub use warp::warp_perspective;

use ndarray::Zip;
use tracing::debug;

use crate::consts::MIN_PERSPECTIVE_CORRESPONDENCES;
use crate::error::{FlowTrackError, Result};
use crate::frame::Frame;
use crate::point::Point2D;

/// Perspective fitting and warping used by background compensation.
pub trait PerspectiveModel: Send + Sync {
    fn fit(&self, src: &[Point2D], dst: &[Point2D]) -> Result<Homography>;
    fn warp(&self, frame: &Frame, transform: &Homography) -> Result<Frame>;
}

/// Least-squares DLT fit with bilinear inverse warping.
#[derive(Clone, Copy, Debug, Default)]
pub struct DltPerspective;

impl PerspectiveModel for DltPerspective {
    fn fit(&self, src: &[Point2D], dst: &[Point2D]) -> Result<Homography> {
        fit_homography(src, dst)
    }

    fn warp(&self, frame: &Frame, transform: &Homography) -> Result<Frame> {
        warp_perspective(frame, transform)
    }
}

/// Mask of pixels in `second` that do not follow the motion of `src -> dst`.
///
/// Requires at least four correspondences.
pub fn compensate_motion(
    first: &Frame,
    second: &Frame,
    src: &[Point2D],
    dst: &[Point2D],
    threshold: f32,
    model: &dyn PerspectiveModel,
) -> Result<Frame> {
    if src.len() < MIN_PERSPECTIVE_CORRESPONDENCES {
        return Err(FlowTrackError::InsufficientCorrespondence {
            found: src.len(),
            required: MIN_PERSPECTIVE_CORRESPONDENCES,
        });
    }

    let transform = model.fit(src, dst)?;
    debug!(matrix = ?transform.matrix, pairs = src.len(), "Perspective transform fitted");
    let predicted = model.warp(first, &transform)?;
    difference_mask(&predicted, second, threshold)
}

/// Binary mask: 1.0 where `|a - b| > threshold`, 0.0 elsewhere.
pub fn difference_mask(a: &Frame, b: &Frame, threshold: f32) -> Result<Frame> {
    if a.dimensions() != b.dimensions() {
        return Err(FlowTrackError::DimensionMismatch {
            index: 1,
            expected_width: a.width(),
            expected_height: a.height(),
            width: b.width(),
            height: b.height(),
        });
    }
    let mask = Zip::from(&a.data)
        .and(&b.data)
        .map_collect(|&x, &y| if (x - y).abs() > threshold { 1.0 } else { 0.0 });
    Ok(Frame::new(mask))
}
