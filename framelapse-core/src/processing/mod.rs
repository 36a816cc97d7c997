//! Core conversion logic and orchestration.
//!
//! This module organizes the stages of an archive-to-video conversion into
//! submodules and exposes the pipeline that runs them in order.

/// Crop-to-fill, levels normalization and sharpening
pub mod adjustments;

/// Video assembly through ffmpeg
pub mod assemble;

/// Parallel per-frame enhancement
pub mod enhance;

/// Target geometry reconciliation across source images
pub mod geometry;

/// Job orchestration and state machine
pub mod pipeline;

/// FFmpeg event handling during assembly
pub mod progress;

/// Natural ordering of source images
pub mod sequence;

/// Timing metadata of a finished video
pub mod timing;

pub use geometry::{ImageFrame, TargetGeometry};
pub use pipeline::{JobState, Pipeline};
pub use timing::TimelapseMetrics;
