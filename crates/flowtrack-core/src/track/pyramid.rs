//! Gaussian image pyramid for coarse-to-fine tracking.

use ndarray::Array2;

use crate::consts::PYRAMID_BLUR_SIGMA;
use crate::filters::gaussian_blur::gaussian_blur_array;

#[derive(Clone, Debug)]
pub struct Pyramid {
    /// Index 0 is the original resolution, the last entry the coarsest.
    pub levels: Vec<Array2<f32>>,
}

impl Pyramid {
    /// Build up to `max_level` downsampled levels on top of `data`.
    ///
    /// A level is only added while its parent is larger than `min_size` in
    /// both dimensions, so small images get fewer levels.
    pub fn build(data: &Array2<f32>, max_level: usize, min_size: usize) -> Self {
        let mut levels = Vec::with_capacity(max_level + 1);
        levels.push(data.clone());

        while levels.len() <= max_level {
            let Some(parent) = levels.last() else { break };
            let (h, w) = parent.dim();
            if h / 2 <= min_size || w / 2 <= min_size {
                break;
            }
            let blurred = gaussian_blur_array(parent, PYRAMID_BLUR_SIGMA);
            levels.push(downsample_2x(&blurred));
        }

        Self { levels }
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn level(&self, index: usize) -> &Array2<f32> {
        &self.levels[index]
    }
}

/// Downsample an image by 2x by taking every other pixel.
fn downsample_2x(data: &Array2<f32>) -> Array2<f32> {
    let (h, w) = data.dim();
    Array2::from_shape_fn((h / 2, w / 2), |(r, c)| data[[r * 2, c * 2]])
}
