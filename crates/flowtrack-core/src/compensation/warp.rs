use ndarray::{Array2, Axis};
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::{FlowTrackError, Result};
use crate::frame::Frame;
use crate::point::Point2D;
use crate::track::sampling::sample_bounded;

use super::homography::Homography;

/// Warp `frame` through `transform` onto a canvas of the same size.
///
/// Each output pixel samples the source at the inverse-mapped position with
/// bilinear interpolation; pixels that map outside the source are 0.
pub fn warp_perspective(frame: &Frame, transform: &Homography) -> Result<Frame> {
    let inverse = transform.inverse().ok_or_else(|| {
        FlowTrackError::DegenerateTransform("cannot invert transform for warping".into())
    })?;
    let (h, w) = frame.data.dim();
    let src = &frame.data;

    let warp_row = |row: usize, mut out: ndarray::ArrayViewMut1<f32>| {
        for col in 0..w {
            out[col] = inverse
                .apply(Point2D::new(col as f32, row as f32))
                .and_then(|p| sample_bounded(src, p.x, p.y))
                .unwrap_or(0.0);
        }
    };

    let mut result = Array2::<f32>::zeros((h, w));
    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        result
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(row, out)| warp_row(row, out));
    } else {
        for (row, out) in result.axis_iter_mut(Axis(0)).enumerate() {
            warp_row(row, out);
        }
    }

    let mut warped = Frame::new(result);
    warped.metadata = frame.metadata.clone();
    Ok(warped)
}
