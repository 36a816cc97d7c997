// ============================================================================
// framelapse-cli/src/progress.rs
// ============================================================================
//
// PROGRESS REPORTING: indicatif progress bar driven by pipeline events
//
// The bar is reused across the two long stages of a job: it counts enhanced
// frames first, then restarts for the encoder's frame counter.

use framelapse_core::{Event, EventHandler};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const BAR_TEMPLATE: &str = "{prefix:>10.cyan.bold} [{bar:40.cyan/blue}] {pos}/{len} frames ({percent}%) {elapsed_precise}";

/// Event handler that renders enhancement and encoding progress on stderr.
pub struct ProgressBarHandler {
    bar: ProgressBar,
}

impl ProgressBarHandler {
    pub fn new() -> Self {
        Self::with_bar(ProgressBar::new(0))
    }

    /// Handler whose bar never draws. Used for JSON output modes.
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::with_draw_target(
            Some(0),
            ProgressDrawTarget::hidden(),
        ))
    }

    fn with_bar(bar: ProgressBar) -> Self {
        if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        Self { bar }
    }

    fn restart(&self, prefix: &'static str, length: u64) {
        self.bar.reset();
        self.bar.set_length(length);
        self.bar.set_position(0);
        self.bar.set_prefix(prefix);
    }

    #[cfg(test)]
    fn position(&self) -> (u64, Option<u64>) {
        (self.bar.position(), self.bar.length())
    }
}

impl Default for ProgressBarHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for ProgressBarHandler {
    fn handle(&self, event: &Event) {
        match event {
            Event::GeometryResolved { frame_count, .. } => {
                self.restart("Enhancing", *frame_count as u64);
            }
            Event::FrameEnhanced { completed, .. } => {
                self.bar.set_position(*completed as u64);
            }
            Event::EncodingStarted { total_frames } => {
                self.restart("Encoding", *total_frames);
            }
            Event::EncodingProgress { current_frame, .. } => {
                self.bar.set_position(*current_frame);
            }
            Event::JobCompleted { .. } | Event::JobFailed { .. } => {
                self.bar.finish_and_clear();
            }
            Event::Warning { message } => {
                self.bar.suspend(|| eprintln!("Warning: {message}"));
            }
            Event::StateChanged { .. } | Event::ImagesDiscovered { .. } => {}
        }
    }
}
