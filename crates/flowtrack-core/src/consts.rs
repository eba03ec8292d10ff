/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Minimum point count to track points on the Rayon pool.
pub const PARALLEL_POINT_THRESHOLD: usize = 256;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Default spacing (in pixels) between seeded grid points.
pub const DEFAULT_PIXEL_STEP: usize = 10;

/// Default displacement (in pixels, per axis) above which a vector counts
/// as significant motion.
pub const DEFAULT_MIN_VECTOR_SIZE: f32 = 1.0;

/// Width of the image border (in pixels) that ends trajectory growth.
pub const DEFAULT_BORDER_MARGIN: f32 = 10.0;

/// Binarization cutoff for the motion-compensated difference image,
/// 190 on an 8-bit scale.
pub const DEFAULT_COMPENSATION_THRESHOLD: f32 = 190.0 / 255.0;

/// Number of correspondences needed to fit a perspective transform.
pub const MIN_PERSPECTIVE_CORRESPONDENCES: usize = 4;

/// Default Lucas-Kanade integration window (pixels per side).
pub const DEFAULT_LK_WINDOW_SIZE: usize = 40;

/// Default number of pyramid levels above the full-resolution frame.
pub const DEFAULT_LK_MAX_LEVEL: usize = 5;

/// Default Gauss-Newton iteration cap per pyramid level.
pub const DEFAULT_LK_MAX_ITERATIONS: usize = 10;

/// Default per-level convergence threshold on the update step (pixels).
pub const DEFAULT_LK_EPSILON: f32 = 0.03;

/// Default minimum eigenvalue of the normalized spatial gradient matrix,
/// for intensities in [0.0, 1.0].
pub const DEFAULT_LK_MIN_EIGEN_THRESHOLD: f32 = 1e-4;

/// Gaussian blur sigma applied before each pyramid decimation.
pub const PYRAMID_BLUR_SIGMA: f32 = 1.0;

/// Value used for the origin of a vector whose point was lost.
pub const LOST_ORIGIN: f32 = -1.0;
