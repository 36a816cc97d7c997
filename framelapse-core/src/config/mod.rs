//! Configuration structures and constants for the framelapse-core library.
//!
//! This module provides the configuration for the conversion pipeline:
//! where temporary workspaces and finished videos live, how many worker
//! threads a job may use, and the fixed tables the pipeline stages share.

mod builder;

use crate::error::{CoreError, CoreResult};

use std::path::PathBuf;
use std::time::Duration;

pub use builder::CoreConfigBuilder;

// ---- Request defaults and limits ----

/// Default output frame rate when the caller does not specify one.
pub const DEFAULT_FRAME_RATE: u32 = 25;

/// Default real-world seconds between two source photographs.
pub const DEFAULT_CAPTURE_INTERVAL_SECS: f64 = 1.0;

/// Accepted frame rate range (inclusive).
pub const MIN_FRAME_RATE: u32 = 1;
pub const MAX_FRAME_RATE: u32 = 120;

/// Accepted capture interval range in seconds (inclusive), 0.1s up to 24 hours.
pub const MIN_CAPTURE_INTERVAL_SECS: f64 = 0.1;
pub const MAX_CAPTURE_INTERVAL_SECS: f64 = 86_400.0;

/// Intervals above this many seconds are presented as a timelapse.
pub const TIMELAPSE_INTERVAL_THRESHOLD_SECS: f64 = 1.0;

/// A job needs at least this many usable images.
pub const MIN_SOURCE_IMAGES: usize = 2;

// ---- Frame enhancement ----

/// JPEG quality used when re-encoding frames, per quality tier.
pub const JPEG_QUALITY_HIGH: u8 = 95;
pub const JPEG_QUALITY_MEDIUM: u8 = 85;
pub const JPEG_QUALITY_LOW: u8 = 75;

/// Unsharp mask parameters for the mild sharpening pass.
pub const SHARPEN_SIGMA: f32 = 1.0;
pub const SHARPEN_THRESHOLD: i32 = 1;

/// Percentiles of the luminance histogram mapped to black and white by the
/// levels normalization.
pub const NORMALIZE_LOW_PERCENTILE: f64 = 0.01;
pub const NORMALIZE_HIGH_PERCENTILE: f64 = 0.99;

/// Zero-padded width of processed frame file names (`frame_000001.jpg`).
pub const FRAME_INDEX_WIDTH: usize = 6;

/// File name pattern the encoder reads processed frames with.
pub const FRAME_FILE_PATTERN: &str = "frame_%06d.jpg";

/// Extensions (lowercase, without dot) accepted as source images.
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "webp"];

// ---- Video assembly ----

pub const VIDEO_CODEC: &str = "libx264";
pub const PIXEL_FORMAT: &str = "yuv420p";
pub const MOVFLAGS: &str = "+faststart";
pub const CONTENT_TUNE: &str = "film";

/// Deshake filter with a fixed 16px search window.
pub const DESHAKE_FILTER: &str = "deshake=x=-1:y=-1:w=-1:h=-1:rx=16:ry=16";

/// Fades never run longer than this many frames.
pub const MAX_FADE_FRAMES: u32 = 30;

/// Fraction of the total frame count used for each fade.
pub const FADE_FRACTION: f64 = 0.05;

/// Main configuration structure for the framelapse-core library.
///
/// All fields have sensible defaults. The builder pattern provides a
/// convenient way to create and configure instances.
///
/// # Examples
///
/// ```rust
/// use framelapse_core::config::CoreConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .temp_dir(PathBuf::from("/tmp/framelapse"))
///     .output_dir(PathBuf::from("./outputs"))
///     .max_workers(4)
///     .build();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Root under which per-job workspaces are created
    pub temp_dir: PathBuf,

    /// Directory where finished videos are stored
    pub output_dir: PathBuf,

    /// Upper bound on worker threads used for header scanning and enhancement
    pub max_workers: usize,

    /// Kill the encoder and fail the job when assembly runs longer than this
    pub encode_timeout: Option<Duration>,

    /// Lowercase file extensions accepted as source images
    pub image_extensions: Vec<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            temp_dir: PathBuf::from("./temp"),
            output_dir: PathBuf::from("./outputs"),
            max_workers: default_max_workers(),
            encode_timeout: None,
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
        }
    }
}

impl CoreConfig {
    /// Creates a configuration with the given directories and defaults for
    /// everything else.
    #[must_use]
    pub fn new(temp_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            temp_dir,
            output_dir,
            ..Self::default()
        }
    }

    /// Checks the configuration for values the pipeline cannot work with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_workers == 0 {
            return Err(CoreError::Config(
                "max_workers must be at least 1".to_string(),
            ));
        }
        if self.image_extensions.is_empty() {
            return Err(CoreError::Config(
                "at least one image extension is required".to_string(),
            ));
        }
        if self.encode_timeout.is_some_and(|t| t.is_zero()) {
            return Err(CoreError::Config(
                "encode_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns true when `ext` (any case, without dot) is an accepted image extension.
    #[must_use]
    pub fn accepts_extension(&self, ext: &str) -> bool {
        self.image_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    }
}

/// Worker count used when none is configured: the machine's available parallelism.
#[must_use]
pub fn default_max_workers() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
}
