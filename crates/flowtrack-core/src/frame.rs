use ndarray::Array2;

use crate::error::{FlowTrackError, Result};

/// A single grayscale video frame.
/// Pixel values are f32 in [0.0, 1.0].
#[derive(Clone, Debug)]
pub struct Frame {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<f32>,
    /// Optional per-frame metadata
    pub metadata: FrameMetadata,
}

impl Frame {
    pub fn new(data: Array2<f32>) -> Self {
        Self {
            data,
            metadata: FrameMetadata::default(),
        }
    }

    /// Build a frame from 8-bit row-major pixels.
    pub fn from_u8(width: usize, height: usize, pixels: &[u8]) -> Result<Self> {
        if pixels.len() != width * height {
            return Err(FlowTrackError::InvalidDimensions {
                width: width as u32,
                height: height as u32,
            });
        }
        let data = Array2::from_shape_fn((height, width), |(row, col)| {
            pixels[row * width + col] as f32 / 255.0
        });
        Ok(Self::new(data))
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct FrameMetadata {
    pub frame_index: usize,
    pub timestamp_us: Option<u64>,
}

/// Check that every frame shares the size of the first one.
pub fn ensure_uniform_dimensions(frames: &[Frame]) -> Result<(usize, usize)> {
    let first = frames.first().ok_or(FlowTrackError::EmptySequence)?;
    let (expected_width, expected_height) = first.dimensions();

    for (index, frame) in frames.iter().enumerate().skip(1) {
        let (width, height) = frame.dimensions();
        if width != expected_width || height != expected_height {
            return Err(FlowTrackError::DimensionMismatch {
                index,
                expected_width,
                expected_height,
                width,
                height,
            });
        }
    }

    Ok((expected_width, expected_height))
}
