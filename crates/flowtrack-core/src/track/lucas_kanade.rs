//! Pyramidal Lucas-Kanade point tracker.
//!
//! Each point is refined from the coarsest pyramid level to full resolution
//! with Gauss-Newton steps on the windowed brightness-constancy residual.
//! A point is reported invalid when its window carries too little texture at
//! full resolution, when the iteration diverges, or when the result leaves
//! the image by more than half a window.

use ndarray::Array2;
use rayon::prelude::*;
use tracing::debug;

use crate::consts::PARALLEL_POINT_THRESHOLD;
use crate::error::{FlowTrackError, Result};
use crate::frame::Frame;
use crate::pipeline::config::TrackerConfig;
use crate::point::Point2D;

use super::pyramid::Pyramid;
use super::sampling::{central_gradients, sample_clamped};
use super::{PointTracker, TrackOutput};

/// Previous-frame level with its precomputed gradients.
struct GradientLevel<'a> {
    image: &'a Array2<f32>,
    gx: Array2<f32>,
    gy: Array2<f32>,
}

#[derive(Clone, Debug)]
pub struct PyramidalLk {
    config: TrackerConfig,
}

impl PyramidalLk {
    pub fn new(config: TrackerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Window sample offsets (x, y) relative to the window center, row-major.
    fn window_offsets(&self) -> Vec<(f32, f32)> {
        let n = self.config.window_size;
        let half = (n as f32 - 1.0) * 0.5;
        (0..n * n)
            .map(|i| ((i % n) as f32 - half, (i / n) as f32 - half))
            .collect()
    }

    fn track_point(
        &self,
        prev_levels: &[GradientLevel<'_>],
        next: &Pyramid,
        offsets: &[(f32, f32)],
        point: Point2D,
    ) -> Option<Point2D> {
        let half = (self.config.window_size as f32 - 1.0) * 0.5;
        let area = offsets.len() as f32;
        let eps2 = self.config.epsilon * self.config.epsilon;

        // Displacement estimate at the current level's scale.
        let mut gx_total = 0.0f32;
        let mut gy_total = 0.0f32;

        for level in (0..prev_levels.len()).rev() {
            let prev = &prev_levels[level];
            let next_img = next.level(level);
            let (h, w) = prev.image.dim();
            let scale = 1.0 / (1u32 << level) as f32;
            let ux = point.x * scale;
            let uy = point.y * scale;

            if ux < -half || uy < -half || ux >= w as f32 + half || uy >= h as f32 + half {
                if level == 0 {
                    return None;
                }
                gx_total *= 2.0;
                gy_total *= 2.0;
                continue;
            }

            // Spatial gradient matrix and template over the window.
            let mut g11 = 0.0f32;
            let mut g12 = 0.0f32;
            let mut g22 = 0.0f32;
            let mut template = Vec::with_capacity(offsets.len());
            for &(ox, oy) in offsets {
                let x = ux + ox;
                let y = uy + oy;
                let ix = sample_clamped(&prev.gx, x, y);
                let iy = sample_clamped(&prev.gy, x, y);
                g11 += ix * ix;
                g12 += ix * iy;
                g22 += iy * iy;
                template.push((sample_clamped(prev.image, x, y), ix, iy));
            }

            let det = g11 * g22 - g12 * g12;
            let trace = g11 + g22;
            let min_eig =
                (trace - ((g11 - g22) * (g11 - g22) + 4.0 * g12 * g12).sqrt()) / (2.0 * area);
            if min_eig < self.config.min_eigen_threshold || det.abs() < f32::EPSILON {
                if level == 0 {
                    return None;
                }
                gx_total *= 2.0;
                gy_total *= 2.0;
                continue;
            }
            let inv_det = 1.0 / det;

            let mut dx = 0.0f32;
            let mut dy = 0.0f32;
            for _ in 0..self.config.max_iterations {
                let mut bx = 0.0f32;
                let mut by = 0.0f32;
                for (&(ox, oy), &(i0, ix, iy)) in offsets.iter().zip(&template) {
                    let j = sample_clamped(next_img, ux + gx_total + dx + ox, uy + gy_total + dy + oy);
                    let it = j - i0;
                    bx += it * ix;
                    by += it * iy;
                }

                let step_x = -inv_det * (g22 * bx - g12 * by);
                let step_y = -inv_det * (g11 * by - g12 * bx);
                if !step_x.is_finite() || !step_y.is_finite() {
                    return None;
                }
                dx += step_x;
                dy += step_y;
                if step_x * step_x + step_y * step_y < eps2 {
                    break;
                }
            }

            gx_total += dx;
            gy_total += dy;
            if level > 0 {
                gx_total *= 2.0;
                gy_total *= 2.0;
            }
        }

        let tracked = Point2D::new(point.x + gx_total, point.y + gy_total);
        let (h, w) = prev_levels[0].image.dim();
        let in_reach = tracked.x >= -half
            && tracked.y >= -half
            && tracked.x < w as f32 + half
            && tracked.y < h as f32 + half;
        (tracked.is_finite() && in_reach).then_some(tracked)
    }
}

impl PointTracker for PyramidalLk {
    fn track(&self, prev: &Frame, next: &Frame, points: &[Point2D]) -> Result<TrackOutput> {
        if prev.is_empty() || next.is_empty() {
            return Err(FlowTrackError::TrackerFailure("empty frame".into()));
        }
        if prev.dimensions() != next.dimensions() {
            return Err(FlowTrackError::TrackerFailure(format!(
                "frame sizes differ: {}x{} vs {}x{}",
                prev.width(),
                prev.height(),
                next.width(),
                next.height()
            )));
        }

        let prev_pyr = Pyramid::build(&prev.data, self.config.max_level, self.config.window_size);
        let next_pyr = Pyramid::build(&next.data, self.config.max_level, self.config.window_size);
        let prev_levels: Vec<GradientLevel<'_>> = prev_pyr
            .levels
            .iter()
            .map(|image| {
                let (gx, gy) = central_gradients(image);
                GradientLevel { image, gx, gy }
            })
            .collect();
        let offsets = self.window_offsets();

        let track_one = |p: &Point2D| match self.track_point(&prev_levels, &next_pyr, &offsets, *p) {
            Some(q) => (q, true),
            None => (*p, false),
        };

        let results: Vec<(Point2D, bool)> = if points.len() >= PARALLEL_POINT_THRESHOLD {
            points.par_iter().map(track_one).collect()
        } else {
            points.iter().map(track_one).collect()
        };

        let (points_out, valid): (Vec<Point2D>, Vec<bool>) = results.into_iter().unzip();
        let output = TrackOutput {
            points: points_out,
            valid,
        };
        debug!(
            points = output.len(),
            valid = output.valid_count(),
            levels = prev_levels.len(),
            "Lucas-Kanade pass complete"
        );
        Ok(output)
    }

    fn name(&self) -> &str {
        "pyramidal-lk"
    }
}
