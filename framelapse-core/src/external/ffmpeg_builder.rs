//! FFmpeg command builder utilities
//!
//! This module provides a builder pattern for constructing FFmpeg commands
//! with the common options every invocation in this crate shares, and a
//! builder for `-vf` filter chains.

use ffmpeg_sidecar::command::FfmpegCommand;

/// Builder for ffmpeg commands: `-hide_banner -y` followed by the caller's arguments
pub struct FfmpegCommandBuilder {
    cmd: FfmpegCommand,
}

impl Default for FfmpegCommandBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegCommandBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cmd: FfmpegCommand::new(),
        }
    }

    /// Builds the command. The output file is always overwritten.
    #[must_use]
    pub fn build_with_args(mut self, args: &[String]) -> FfmpegCommand {
        self.cmd.arg("-hide_banner").arg("-y").args(args);
        self.cmd
    }
}

/// Builder for constructing video filter chains
#[derive(Default)]
pub struct VideoFilterChain {
    filters: Vec<String>,
}

impl VideoFilterChain {
    /// Creates a new empty filter chain
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter to the chain; empty filters are ignored
    #[must_use]
    pub fn add_filter(mut self, filter: impl Into<String>) -> Self {
        let filter = filter.into();
        if !filter.is_empty() {
            self.filters.push(filter);
        }
        self
    }

    /// Adds a filter only when `filter` is `Some`
    #[must_use]
    pub fn add_optional(self, filter: Option<String>) -> Self {
        match filter {
            Some(f) => self.add_filter(f),
            None => self,
        }
    }

    /// Builds the filter chain into a single filter string
    #[must_use]
    pub fn build(self) -> Option<String> {
        if self.filters.is_empty() {
            None
        } else {
            Some(self.filters.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_chain() {
        assert_eq!(VideoFilterChain::new().build(), None);
        assert_eq!(VideoFilterChain::new().add_filter("").build(), None);
    }

    #[test]
    fn test_filter_chain_keeps_order() {
        let chain = VideoFilterChain::new()
            .add_filter("deshake")
            .add_optional(None)
            .add_optional(Some("fade=in:0:5".to_string()))
            .build();
        assert_eq!(chain.as_deref(), Some("deshake,fade=in:0:5"));
    }

    #[test]
    fn test_command_builder_prefix() {
        let cmd = FfmpegCommandBuilder::new().build_with_args(&["-i".to_string(), "x".to_string()]);
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        let banner = args.iter().position(|a| a == "-hide_banner").unwrap();
        let overwrite = args.iter().position(|a| a == "-y").unwrap();
        let input = args.iter().position(|a| a == "-i").unwrap();
        assert!(banner < input && overwrite < input);
        assert_eq!(args.last().map(String::as_str), Some("x"));
    }
}
