//! Dense per-pixel displacement storage.
//!
//! Only cells addressed by tracked grid points are ever written. An unwritten
//! cell (`None`) is distinct from a written zero vector and from a written
//! "lost" vector whose origin is the `(-1, -1)` sentinel.

use ndarray::Array2;

use crate::consts::LOST_ORIGIN;
use crate::point::Point2D;

/// Displacement recorded for one tracked point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowVector {
    pub origin: Point2D,
    pub dx: f32,
    pub dy: f32,
}

impl FlowVector {
    pub fn new(origin: Point2D, dx: f32, dy: f32) -> Self {
        Self { origin, dx, dy }
    }

    /// Tracked, but below the motion threshold.
    pub fn stationary(origin: Point2D) -> Self {
        Self::new(origin, 0.0, 0.0)
    }

    /// The tracker could not follow the point.
    pub fn lost() -> Self {
        Self::new(Point2D::new(LOST_ORIGIN, LOST_ORIGIN), 0.0, 0.0)
    }

    pub fn is_lost(&self) -> bool {
        self.origin.x == LOST_ORIGIN && self.origin.y == LOST_ORIGIN
    }

    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

/// Displacement vectors on the image pixel grid, shape = (height, width).
#[derive(Clone, Debug)]
pub struct DisplacementField {
    cells: Array2<Option<FlowVector>>,
}

impl DisplacementField {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: Array2::from_elem((height, width), None),
        }
    }

    pub fn width(&self) -> usize {
        self.cells.ncols()
    }

    pub fn height(&self) -> usize {
        self.cells.nrows()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&FlowVector> {
        self.cells.get((row, col)).and_then(|cell| cell.as_ref())
    }

    /// Write `vector` into the cell under `at`, truncating the coordinate to
    /// whole pixels. Returns `false` when `at` falls outside the field.
    pub fn record(&mut self, at: Point2D, vector: FlowVector) -> bool {
        if !at.is_finite() || at.x < 0.0 || at.y < 0.0 {
            return false;
        }
        let col = at.x as usize;
        let row = at.y as usize;
        match self.cells.get_mut((row, col)) {
            Some(cell) => {
                *cell = Some(vector);
                true
            }
            None => false,
        }
    }

    /// Number of cells holding a vector (lost vectors included).
    pub fn populated_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Iterate over written cells as `(row, col, vector)` in row-major order.
    pub fn iter_populated(&self) -> impl Iterator<Item = (usize, usize, &FlowVector)> + '_ {
        self.cells
            .indexed_iter()
            .filter_map(|((row, col), cell)| cell.as_ref().map(|v| (row, col, v)))
    }

    /// Horizontal and vertical components of a cell for serialization;
    /// empty and lost cells read as zero.
    pub fn components(&self, row: usize, col: usize) -> (f32, f32) {
        match self.get(row, col) {
            Some(v) if !v.is_lost() => (v.dx, v.dy),
            _ => (0.0, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_truncates_coordinates() {
        let mut field = DisplacementField::new(8, 6);
        assert!(field.record(Point2D::new(3.9, 2.2), FlowVector::new(Point2D::new(3.9, 2.2), 1.0, 2.0)));
        assert_eq!(field.get(2, 3).map(|v| v.dx), Some(1.0));
        assert_eq!(field.populated_count(), 1);
    }

    #[test]
    fn test_record_outside_is_rejected() {
        let mut field = DisplacementField::new(8, 6);
        assert!(!field.record(Point2D::new(-0.5, 1.0), FlowVector::lost()));
        assert!(!field.record(Point2D::new(8.0, 1.0), FlowVector::lost()));
        assert!(!field.record(Point2D::new(f32::NAN, 1.0), FlowVector::lost()));
        assert_eq!(field.populated_count(), 0);
    }

    #[test]
    fn test_lost_and_empty_serialize_as_zero() {
        let mut field = DisplacementField::new(4, 4);
        field.record(Point2D::new(1.0, 1.0), FlowVector::lost());
        assert_eq!(field.components(1, 1), (0.0, 0.0));
        assert_eq!(field.components(0, 0), (0.0, 0.0));
        assert!(field.get(1, 1).is_some_and(|v| v.is_lost()));
        assert!(field.get(0, 0).is_none());
    }
}
