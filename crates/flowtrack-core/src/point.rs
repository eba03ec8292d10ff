use serde::{Deserialize, Serialize};

/// Sub-pixel image coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Displacement from `self` to `other`.
    pub fn delta_to(&self, other: &Point2D) -> (f32, f32) {
        (other.x - self.x, other.y - self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// True when the point lies strictly inside a `width` x `height` image
    /// shrunk by `margin` on every side.
    pub fn is_inside(&self, width: usize, height: usize, margin: f32) -> bool {
        self.x > margin
            && self.y > margin
            && self.x < width as f32 - margin
            && self.y < height as f32 - margin
    }
}

/// Ordered points; the index is the identity of a tracked point.
pub type PointSet = Vec<Point2D>;

/// Positions of one tracked point, one entry per frame it was followed into.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub points: Vec<Point2D>,
}

impl Trajectory {
    /// Start a trajectory at its seed position.
    pub fn start(seed: Point2D) -> Self {
        Self { points: vec![seed] }
    }

    pub fn push(&mut self, point: Point2D) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A trajectory is complete when it holds one point per frame.
    pub fn is_complete(&self, frame_count: usize) -> bool {
        self.points.len() == frame_count
    }

    pub fn first(&self) -> Option<&Point2D> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Point2D> {
        self.points.last()
    }
}
