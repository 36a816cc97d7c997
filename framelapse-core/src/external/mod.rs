// ============================================================================
// framelapse-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with Archives, Image Codecs and FFmpeg
//
// This module encapsulates the collaborators the conversion pipeline depends
// on. Each one is hidden behind a trait so the pipeline can be driven by fakes
// in tests.
//
// KEY COMPONENTS:
// - ArchiveExtractor / ZipArchiveExtractor: unpacking source archives
// - ImageProcessor / StandardImageProcessor: image decode, adjust, encode
// - FfmpegSpawner / FfmpegProcess: running the video encoder
// - Dependency checking for the ffmpeg binary

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::io;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Archive extraction trait and ZIP implementation
pub mod archive;

/// FFmpeg command and filter chain builders
pub mod ffmpeg_builder;

/// Contains traits and implementations for executing ffmpeg commands
pub mod ffmpeg_executor;

/// Image decoding, adjustment and JPEG re-encoding
pub mod image_processor;

/// Test doubles, compiled with the `test-mocks` feature
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use archive::{ArchiveExtractor, ZipArchiveExtractor};
pub use ffmpeg_builder::{FfmpegCommandBuilder, VideoFilterChain};
pub use ffmpeg_executor::{FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner};
pub use image_processor::{ImageProcessor, StandardImageProcessor};

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks if a required external command is available and executable.
///
/// Runs `<cmd_name> -version` with output discarded. Only a failure to start
/// the command counts; its exit status is ignored.
///
/// # Errors
///
/// * `CoreError::DependencyNotFound` - If the command is not found
/// * `CoreError::CommandStart` - If the command exists but fails to start
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {cmd_name}");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{cmd_name}' not found.");
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{cmd_name}': {e}");
            Err(CoreError::CommandStart(cmd_name.to_string(), e))
        }
    }
}
