//! Core library for turning archives of still images into videos and timelapses.
//!
//! The pipeline extracts a ZIP archive, orders the images into a shooting
//! sequence, picks one even frame size for all of them, enhances every frame
//! and encodes the sequence to H.264/MP4 with ffmpeg. It reports timing
//! metadata such as how much real time the video compresses and by how much.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use framelapse_core::{ConversionRequest, CoreConfig, Pipeline, QualityTier};
//! use std::path::PathBuf;
//!
//! let config = CoreConfig::new(PathBuf::from("./temp"), PathBuf::from("./outputs"));
//! let mut request = ConversionRequest::new(
//!     PathBuf::from("construction.zip"),
//!     PathBuf::from("./outputs/construction.mp4"),
//! );
//! request.capture_interval_secs = 300.0;
//! request.quality = QualityTier::High;
//! request.stabilize = true;
//!
//! let metrics = Pipeline::standard(config).convert(&request).unwrap();
//! println!("{} frames, {}x faster than real time", metrics.frame_count, metrics.speedup_factor);
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod events;
pub mod external;
pub mod file_logging;
pub mod library;
pub mod presets;
pub mod processing;
pub mod request;
pub mod utils;
pub mod workspace;

// Re-exports for public API
pub use config::{CoreConfig, CoreConfigBuilder};
pub use error::{CoreError, CoreResult};
pub use events::{Event, EventDispatcher, EventHandler};
pub use external::check_dependency;
pub use processing::{ImageFrame, JobState, Pipeline, TargetGeometry, TimelapseMetrics};
pub use request::{ConversionKind, ConversionRequest, QualityTier, Transition};
pub use utils::{format_bytes, format_duration, format_duration_words};
pub use workspace::Workspace;
