// ============================================================================
// framelapse-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP
//
// Without `--log-dir` the CLI logs through env_logger, which honours
// RUST_LOG. With `--log-dir` it installs the core's log4rs setup so every
// run leaves a timestamped log file behind.

use crate::error::{CliErrorContext, CliResult};

use log::LevelFilter;
use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Log file path for a run started now.
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(format!("framelapse_{}.log", get_timestamp()))
}

/// Installs the process-wide logger. Returns the log file path when one is written.
pub fn init(verbose: bool, log_dir: Option<&Path>) -> CliResult<Option<PathBuf>> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    match log_dir {
        Some(dir) => {
            let path = log_file_path(dir);
            framelapse_core::file_logging::setup_file_logging(&path, level)
                .cli_with_context(|| format!("Failed to set up logging in {}", dir.display()))?;
            Ok(Some(path))
        }
        None => {
            env_logger::Builder::new()
                .filter_level(level)
                .parse_default_env()
                .format_timestamp(None)
                .init();
            Ok(None)
        }
    }
}
