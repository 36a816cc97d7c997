pub mod setup;

pub use setup::setup_file_logging;

use crate::events::{Event, EventHandler};
use crate::utils::format_duration_words;
use log::{debug, info, warn, error};
use std::sync::Mutex;

/// Percent step between two logged enhancement or encoding progress lines.
const LOG_STEP_PERCENT: u32 = 10;

/// Writes pipeline events to the log, throttling progress to every 10%.
pub struct FileLoggingHandler {
    last_logged_percent: Mutex<Option<u32>>,
}

impl Default for FileLoggingHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl FileLoggingHandler {
    pub fn new() -> Self {
        Self {
            last_logged_percent: Mutex::new(None),
        }
    }

    fn reset_progress_state(&self) {
        if let Ok(mut last) = self.last_logged_percent.lock() {
            *last = None;
        }
    }

    /// True when `percent` crossed into a new 10% step since the last log line.
    fn should_log(&self, percent: u32) -> bool {
        let Ok(mut last) = self.last_logged_percent.lock() else {
            return false;
        };
        let step = percent / LOG_STEP_PERCENT;
        match *last {
            Some(previous) if previous / LOG_STEP_PERCENT >= step => false,
            _ => {
                *last = Some(percent);
                true
            }
        }
    }
}

impl EventHandler for FileLoggingHandler {
    fn handle(&self, event: &Event) {
        match event {
            Event::StateChanged { state } => {
                debug!("Pipeline state: {state}");
            }

            Event::ImagesDiscovered {
                archive_members,
                usable_images,
            } => {
                info!("Archive contains {archive_members} file(s), {usable_images} usable image(s)");
            }

            Event::GeometryResolved {
                geometry,
                frame_count,
            } => {
                info!("Frame size {geometry} for {frame_count} frame(s)");
                self.reset_progress_state();
            }

            Event::FrameEnhanced { completed, total } => {
                let percent = (*completed * 100 / (*total).max(1)) as u32;
                if self.should_log(percent) {
                    info!("Enhancement progress: {completed}/{total} frames ({percent}%)");
                }
            }

            Event::EncodingStarted { total_frames } => {
                self.reset_progress_state();
                info!("Starting encoding process ({total_frames} frames)");
            }

            Event::EncodingProgress {
                current_frame,
                total_frames,
                percent,
            } => {
                if self.should_log(*percent as u32) {
                    info!("Encoding progress: {percent:.1}% ({current_frame}/{total_frames} frames)");
                }
            }

            Event::JobCompleted {
                output_path,
                metrics,
            } => {
                info!("Video written to {}", output_path.display());
                info!(
                    "  {} frames at {} fps, {:.2}s, {}",
                    metrics.frame_count,
                    metrics.frame_rate,
                    metrics.video_duration_seconds,
                    metrics.geometry
                );
                info!(
                    "  covers {} of real time ({}x speedup)",
                    format_duration_words(metrics.real_duration_seconds),
                    metrics.speedup_factor
                );
            }

            Event::JobFailed { message } => {
                error!("Conversion failed: {message}");
            }

            Event::Warning { message } => {
                warn!("{message}");
            }
        }
    }
}
