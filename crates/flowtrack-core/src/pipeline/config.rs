use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BORDER_MARGIN, DEFAULT_COMPENSATION_THRESHOLD, DEFAULT_LK_EPSILON,
    DEFAULT_LK_MAX_ITERATIONS, DEFAULT_LK_MAX_LEVEL, DEFAULT_LK_MIN_EIGEN_THRESHOLD,
    DEFAULT_LK_WINDOW_SIZE, DEFAULT_MIN_VECTOR_SIZE, DEFAULT_PIXEL_STEP,
};
use crate::error::{FlowTrackError, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Output prefix (flow mode) or trajectory file (trajectory mode).
    pub output: PathBuf,
    #[serde(default)]
    pub mode: PipelineMode,
    /// Where to save the motion-compensation mask (flow mode only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask_output: Option<PathBuf>,
    pub input: InputSource,
    #[serde(default)]
    pub flow: FlowConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
}

impl PipelineConfig {
    /// Parse a TOML config file.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| FlowTrackError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| FlowTrackError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        self.flow.validate()?;
        self.tracker.validate()
    }
}

/// Where the frame sequence comes from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSource {
    /// One image file per frame, in temporal order.
    Images(Vec<PathBuf>),
    /// A SER video; every frame is used.
    Ser(PathBuf),
}

impl InputSource {
    /// Treat a single `.ser` path as a video, anything else as image files.
    pub fn from_paths(paths: &[PathBuf]) -> Self {
        match paths {
            [single] if is_ser_path(single) => Self::Ser(single.clone()),
            _ => Self::Images(paths.to_vec()),
        }
    }
}

fn is_ser_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ser"))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineMode {
    /// Dense displacement between the first two frames.
    Flow,
    /// Full-sequence trajectories.
    #[default]
    Trajectories,
}

impl fmt::Display for PipelineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flow => write!(f, "Flow"),
            Self::Trajectories => write!(f, "Trajectories"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Spacing in pixels between seeded grid points.
    pub pixel_step: usize,
    /// Per-axis displacement above which a vector counts as motion.
    pub min_vector_size: f32,
    /// Width of the border band that stops trajectory growth.
    pub border_margin: f32,
    pub compensation: CompensationConfig,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            pixel_step: DEFAULT_PIXEL_STEP,
            min_vector_size: DEFAULT_MIN_VECTOR_SIZE,
            border_margin: DEFAULT_BORDER_MARGIN,
            compensation: CompensationConfig::default(),
        }
    }
}

impl FlowConfig {
    pub fn with_step(pixel_step: usize) -> Self {
        Self {
            pixel_step,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.pixel_step == 0 {
            return Err(FlowTrackError::Config("pixel_step must be positive".into()));
        }
        if !self.min_vector_size.is_finite() || self.min_vector_size < 0.0 {
            return Err(FlowTrackError::Config(
                "min_vector_size must be a non-negative number".into(),
            ));
        }
        if !self.border_margin.is_finite() || self.border_margin < 0.0 {
            return Err(FlowTrackError::Config(
                "border_margin must be a non-negative number".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.compensation.threshold) {
            return Err(FlowTrackError::Config(
                "compensation threshold must be within [0, 1]".into(),
            ));
        }
        Ok(())
    }
}

/// Background-motion compensation of the two-frame flow.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompensationConfig {
    pub enabled: bool,
    /// Difference (on [0, 1] intensities) above which a pixel is marked.
    pub threshold: f32,
}

impl Default for CompensationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: DEFAULT_COMPENSATION_THRESHOLD,
        }
    }
}

/// Pyramidal Lucas-Kanade parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Integration window side length in pixels.
    pub window_size: usize,
    /// Maximum number of pyramid levels above full resolution.
    pub max_level: usize,
    pub max_iterations: usize,
    /// Stop iterating a level once the update is shorter than this.
    pub epsilon: f32,
    /// Points whose window has a smaller normalized minimum eigenvalue are lost.
    pub min_eigen_threshold: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_LK_WINDOW_SIZE,
            max_level: DEFAULT_LK_MAX_LEVEL,
            max_iterations: DEFAULT_LK_MAX_ITERATIONS,
            epsilon: DEFAULT_LK_EPSILON,
            min_eigen_threshold: DEFAULT_LK_MIN_EIGEN_THRESHOLD,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window_size < 3 {
            return Err(FlowTrackError::Config(
                "window_size must be at least 3".into(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(FlowTrackError::Config(
                "max_iterations must be positive".into(),
            ));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(FlowTrackError::Config("epsilon must be positive".into()));
        }
        if !self.min_eigen_threshold.is_finite() || self.min_eigen_threshold < 0.0 {
            return Err(FlowTrackError::Config(
                "min_eigen_threshold must be non-negative".into(),
            ));
        }
        Ok(())
    }
}
