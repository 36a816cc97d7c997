// ============================================================================
// framelapse-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Custom Error Types for the Conversion Pipeline
//
// This module defines the error taxonomy for framelapse-core. Every stage of
// the pipeline reports failures through `CoreError`, and the orchestrator
// surfaces the first failure to the caller unchanged.
//
// KEY COMPONENTS:
// - CoreError: Main error enum covering every pipeline stage
// - CoreResult: Type alias for Result with CoreError
// - Helper functions for building command execution errors

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors produced by the framelapse-core library.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Request parameters are out of range or incomplete.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Fewer than two usable images were found in the archive.
    #[error("At least 2 images required, found {found}")]
    InsufficientInput { found: usize },

    /// The archive could not be opened or unpacked.
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// A single frame could not be decoded, transformed or written.
    #[error("Enhancement failed for {}: {message}", path.display())]
    Enhancement { path: PathBuf, message: String },

    /// The encoder failed; the message carries the encoder's own diagnostics.
    #[error("Video creation failed: {0}")]
    Encoding(String),

    /// Workspace deletion failed. Logged, never returned as a job outcome.
    #[error("Cleanup failed for {}: {message}", path.display())]
    Cleanup { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed waiting for command '{0}': {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("Command '{cmd}' failed with status {status}: {stderr}")]
    CommandFailed {
        cmd: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Required dependency '{0}' not found")]
    DependencyNotFound(String),

    #[error("Invalid path: {0}")]
    PathError(String),

    #[error("Video not found: {0}")]
    VideoNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failure with caller-supplied context, used by front ends.
    #[error("{0}")]
    OperationFailed(String),
}

/// Result type for framelapse-core operations.
pub type CoreResult<T> = Result<T, CoreError>;

// ---- Command error helpers ----

pub fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

pub fn command_wait_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}

pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        cmd: cmd.into(),
        status,
        stderr: stderr.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_input_message() {
        let err = CoreError::InsufficientInput { found: 1 };
        assert_eq!(err.to_string(), "At least 2 images required, found 1");
    }

    #[test]
    fn test_encoding_message_keeps_encoder_text() {
        let err = CoreError::Encoding("Unknown encoder 'libx264'".to_string());
        assert!(err.to_string().contains("Unknown encoder 'libx264'"));
        assert!(err.to_string().starts_with("Video creation failed"));
    }

    #[test]
    fn test_enhancement_message_names_file() {
        let err = CoreError::Enhancement {
            path: PathBuf::from("/tmp/extract/img_3.jpg"),
            message: "truncated file".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("img_3.jpg"));
        assert!(text.contains("truncated file"));
    }

    #[test]
    fn test_io_conversion() {
        let err: CoreError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(err, CoreError::Io(_)));
    }
}
