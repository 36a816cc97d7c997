//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// Converts an image archive into a video or timelapse.
pub mod convert;
/// Removes a finished video from the output directory.
pub mod delete;
pub mod list;
pub mod presets;
