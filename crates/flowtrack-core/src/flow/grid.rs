use crate::error::{FlowTrackError, Result};
use crate::point::{Point2D, PointSet};

/// Seed one point every `step` pixels over a `width` x `height` image.
///
/// Points are ordered column by column: x is the outer loop and y the inner
/// one, so `(0, 0), (0, step), ..., (step, 0), ...`. The index of a point in
/// the returned set is its identity for the rest of the computation.
pub fn seed_grid(width: usize, height: usize, step: usize) -> Result<PointSet> {
    if step == 0 {
        return Err(FlowTrackError::InvalidStep);
    }

    let columns = width.div_ceil(step);
    let rows = height.div_ceil(step);
    let mut points = Vec::with_capacity(columns * rows);

    for x in (0..width).step_by(step) {
        for y in (0..height).step_by(step) {
            points.push(Point2D::new(x as f32, y as f32));
        }
    }

    Ok(points)
}
