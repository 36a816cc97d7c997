// ============================================================================
// framelapse-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// This module implements the builder pattern for the CoreConfig structure,
// providing a fluent API for creating and configuring CoreConfig instances.
// Every field has a default, so `build()` never fails; call
// `CoreConfig::validate()` on the result before starting a job.

// ---- Standard library imports ----
use std::path::PathBuf;
use std::time::Duration;

// ---- Internal crate imports ----
use super::CoreConfig;

/// Builder for creating CoreConfig instances.
///
/// # Examples
///
/// ```rust
/// use framelapse_core::config::CoreConfigBuilder;
/// use std::time::Duration;
///
/// let config = CoreConfigBuilder::new()
///     .max_workers(2)
///     .encode_timeout(Duration::from_secs(600))
///     .image_extensions(&["jpg", "png"])
///     .build();
/// assert_eq!(config.max_workers, 2);
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfigBuilder {
    config: CoreConfig,
}

impl Default for CoreConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreConfigBuilder {
    /// Creates a new CoreConfigBuilder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: CoreConfig::default(),
        }
    }

    /// Sets the root directory for per-job workspaces.
    #[must_use]
    pub fn temp_dir(mut self, temp_dir: PathBuf) -> Self {
        self.config.temp_dir = temp_dir;
        self
    }

    /// Sets the directory finished videos are written to.
    #[must_use]
    pub fn output_dir(mut self, output_dir: PathBuf) -> Self {
        self.config.output_dir = output_dir;
        self
    }

    /// Sets the maximum number of worker threads per job.
    #[must_use]
    pub fn max_workers(mut self, workers: usize) -> Self {
        self.config.max_workers = workers;
        self
    }

    /// Sets a time limit for the encoder invocation.
    #[must_use]
    pub fn encode_timeout(mut self, timeout: Duration) -> Self {
        self.config.encode_timeout = Some(timeout);
        self
    }

    /// Replaces the accepted source image extensions.
    #[must_use]
    pub fn image_extensions(mut self, extensions: &[&str]) -> Self {
        self.config.image_extensions = extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// Builds a CoreConfig instance from the builder.
    #[must_use]
    pub fn build(self) -> CoreConfig {
        self.config
    }
}
