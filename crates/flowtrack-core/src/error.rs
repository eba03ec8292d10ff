use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowTrackError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid SER file: {0}")]
    InvalidSer(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Frame index {index} out of range (total: {total})")]
    FrameIndexOutOfRange { index: usize, total: usize },

    #[error("Empty frame sequence")]
    EmptySequence,

    #[error(
        "Frame {index} is {width}x{height}, expected {expected_width}x{expected_height}"
    )]
    DimensionMismatch {
        index: usize,
        expected_width: usize,
        expected_height: usize,
        width: usize,
        height: usize,
    },

    #[error("Point tracker failed: {0}")]
    TrackerFailure(String),

    #[error("Insufficient correspondences for perspective fit: {found} (need {required})")]
    InsufficientCorrespondence { found: usize, required: usize },

    #[error("Degenerate perspective transform: {0}")]
    DegenerateTransform(String),

    #[error("Pixel step must be positive")]
    InvalidStep,
}

pub type Result<T> = std::result::Result<T, FlowTrackError>;
