//! Perspective transform estimation from point correspondences.

use nalgebra::{DMatrix, DVector, Matrix3, Vector3};

use crate::consts::MIN_PERSPECTIVE_CORRESPONDENCES;
use crate::error::{FlowTrackError, Result};
use crate::point::Point2D;

/// Relative singular-value cutoff below which the DLT system is rank deficient.
const RANK_TOLERANCE: f64 = 1e-10;

/// Smallest homogeneous scale treated as a finite point.
const HOMOGENEOUS_EPSILON: f64 = 1e-12;

/// 3x3 projective transform acting on homogeneous pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography {
    pub matrix: Matrix3<f64>,
}

impl Homography {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    pub fn from_matrix(matrix: Matrix3<f64>) -> Self {
        Self { matrix }
    }

    /// Map a point; `None` if it lands on the line at infinity.
    pub fn apply(&self, point: Point2D) -> Option<Point2D> {
        let p = self.matrix * Vector3::new(point.x as f64, point.y as f64, 1.0);
        if p.z.abs() < HOMOGENEOUS_EPSILON {
            return None;
        }
        Some(Point2D::new((p.x / p.z) as f32, (p.y / p.z) as f32))
    }

    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(Self::from_matrix)
    }
}

/// Fit the homography mapping `src[i]` onto `dst[i]`.
///
/// Solves the direct linear transform with `h33 = 1` in least squares on
/// Hartley-normalized coordinates. Four pairs give the exact transform;
/// more pairs give the least-squares fit.
pub fn fit_homography(src: &[Point2D], dst: &[Point2D]) -> Result<Homography> {
    if src.len() != dst.len() {
        return Err(FlowTrackError::DegenerateTransform(format!(
            "{} source points but {} destination points",
            src.len(),
            dst.len()
        )));
    }
    let n = src.len();
    if n < MIN_PERSPECTIVE_CORRESPONDENCES {
        return Err(FlowTrackError::InsufficientCorrespondence {
            found: n,
            required: MIN_PERSPECTIVE_CORRESPONDENCES,
        });
    }

    let t_src = normalization(src);
    let t_dst = normalization(dst);

    let mut a = DMatrix::<f64>::zeros(2 * n, 8);
    let mut b = DVector::<f64>::zeros(2 * n);
    for (i, (s, d)) in src.iter().zip(dst).enumerate() {
        let p = t_src * Vector3::new(s.x as f64, s.y as f64, 1.0);
        let q = t_dst * Vector3::new(d.x as f64, d.y as f64, 1.0);
        let (x, y, u, v) = (p.x, p.y, q.x, q.y);

        let r = 2 * i;
        a[(r, 0)] = x;
        a[(r, 1)] = y;
        a[(r, 2)] = 1.0;
        a[(r, 6)] = -u * x;
        a[(r, 7)] = -u * y;
        b[r] = u;

        a[(r + 1, 3)] = x;
        a[(r + 1, 4)] = y;
        a[(r + 1, 5)] = 1.0;
        a[(r + 1, 6)] = -v * x;
        a[(r + 1, 7)] = -v * y;
        b[r + 1] = v;
    }

    let svd = a.svd(true, true);
    let largest = svd.singular_values.max();
    let tolerance = largest * RANK_TOLERANCE;
    if !largest.is_finite() || svd.rank(tolerance) < 8 {
        return Err(FlowTrackError::DegenerateTransform(
            "correspondences do not constrain a perspective transform".into(),
        ));
    }
    let h = svd
        .solve(&b, tolerance)
        .map_err(|e| FlowTrackError::DegenerateTransform(e.to_string()))?;

    let normalized = Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0);
    let t_dst_inv = t_dst
        .try_inverse()
        .ok_or_else(|| FlowTrackError::DegenerateTransform("singular normalization".into()))?;
    let mut matrix = t_dst_inv * normalized * t_src;

    let scale = matrix[(2, 2)];
    if scale.abs() < HOMOGENEOUS_EPSILON {
        return Err(FlowTrackError::DegenerateTransform(
            "transform maps the origin to infinity".into(),
        ));
    }
    matrix /= scale;
    if !matrix.iter().all(|v| v.is_finite()) || matrix.determinant().abs() < HOMOGENEOUS_EPSILON {
        return Err(FlowTrackError::DegenerateTransform(
            "fitted transform is not invertible".into(),
        ));
    }

    Ok(Homography::from_matrix(matrix))
}

/// Similarity moving the centroid to the origin with mean distance sqrt(2).
fn normalization(points: &[Point2D]) -> Matrix3<f64> {
    let n = points.len() as f64;
    let cx = points.iter().map(|p| p.x as f64).sum::<f64>() / n;
    let cy = points.iter().map(|p| p.y as f64).sum::<f64>() / n;
    let mean_dist = points
        .iter()
        .map(|p| ((p.x as f64 - cx).powi(2) + (p.y as f64 - cy).powi(2)).sqrt())
        .sum::<f64>()
        / n;
    let s = if mean_dist > HOMOGENEOUS_EPSILON {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        1.0
    };

    Matrix3::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0)
}
