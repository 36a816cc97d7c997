//! `FFmpeg` progress handler
//!
//! Turns the encoder's event stream into pipeline events and log lines, and
//! keeps the encoder's error output so a failed encode can report it.

use crate::events::{Event, EventDispatcher};
use ffmpeg_sidecar::event::{FfmpegEvent, FfmpegProgress, LogLevel as FfmpegLogLevel};
use std::time::{Duration, Instant};

/// Minimum percentage step between two progress events.
const PROGRESS_STEP_PERCENT: f32 = 1.0;

/// Handler for `FFmpeg` events during video assembly
pub struct FfmpegProgressHandler<'a> {
    total_frames: u64,
    dispatcher: &'a EventDispatcher,
    start_time: Instant,
    last_progress_percent: f32,
    last_log_time: Instant,
    stderr_buffer: String,
}

impl<'a> FfmpegProgressHandler<'a> {
    /// Creates a handler for an encode of `total_frames` frames
    #[must_use]
    pub fn new(total_frames: u64, dispatcher: &'a EventDispatcher) -> Self {
        Self {
            total_frames,
            dispatcher,
            start_time: Instant::now(),
            last_progress_percent: -PROGRESS_STEP_PERCENT,
            last_log_time: Instant::now(),
            stderr_buffer: String::new(),
        }
    }

    /// Handles an `FFmpeg` event
    pub fn handle_event(&mut self, event: FfmpegEvent) {
        match event {
            FfmpegEvent::Progress(progress) => self.handle_progress(&progress),
            FfmpegEvent::Log(level, message) => self.handle_log(&level, &message),
            FfmpegEvent::Error(error) => self.handle_error(&error),
            _ => {}
        }
    }

    /// Gets the accumulated stderr buffer
    #[must_use]
    pub fn stderr_buffer(&self) -> &str {
        &self.stderr_buffer
    }

    /// Time since the handler was created
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    fn handle_progress(&mut self, progress: &FfmpegProgress) {
        let current = u64::from(progress.frame);
        let percent = percent_complete(current, self.total_frames);

        if percent >= self.last_progress_percent + PROGRESS_STEP_PERCENT
            || (percent >= 100.0 && self.last_progress_percent < 100.0)
        {
            self.dispatcher.emit(Event::EncodingProgress {
                current_frame: current.min(self.total_frames),
                total_frames: self.total_frames,
                percent,
            });
            self.last_progress_percent = percent;
        }

        if self.last_log_time.elapsed() >= Duration::from_secs(30) || percent >= 100.0 {
            log::debug!(
                target: "framelapse::progress",
                "Encoding progress: {percent:.1}% | frame {current}/{} | {:.1} fps | {:.2}x",
                self.total_frames,
                progress.fps,
                progress.speed
            );
            self.last_log_time = Instant::now();
        }
    }

    fn handle_log(&mut self, level: &FfmpegLogLevel, message: &str) {
        let log_level = map_ffmpeg_log_level(level);

        if matches!(level, FfmpegLogLevel::Fatal | FfmpegLogLevel::Error) {
            self.push_stderr(message);
        }

        if log_level == log::Level::Info {
            log::debug!(target: "ffmpeg_log", "{message}");
        } else {
            log::log!(target: "ffmpeg_log", log_level, "{message}");
        }
    }

    fn handle_error(&mut self, error: &str) {
        if is_non_critical_ffmpeg_error(error) {
            log::debug!("ffmpeg non-critical message: {error}");
        } else {
            log::error!("ffmpeg stderr error: {error}");
        }
        self.push_stderr(error);
    }

    fn push_stderr(&mut self, line: &str) {
        self.stderr_buffer.push_str(line);
        self.stderr_buffer.push('\n');
    }
}

/// Percentage of `total` frames written, clamped to 100.
#[must_use]
pub fn percent_complete(current: u64, total: u64) -> f32 {
    if total == 0 {
        return 0.0;
    }
    ((current as f64 / total as f64) * 100.0).min(100.0) as f32
}

/// Maps `FFmpeg` log level to Rust log level
fn map_ffmpeg_log_level(level: &FfmpegLogLevel) -> log::Level {
    match level {
        FfmpegLogLevel::Fatal | FfmpegLogLevel::Error => log::Level::Error,
        FfmpegLogLevel::Warning => log::Level::Warn,
        FfmpegLogLevel::Info => log::Level::Info,
        _ => log::Level::Trace,
    }
}

/// `FFmpeg` messages that appear on stderr without indicating a problem.
fn is_non_critical_ffmpeg_error(error: &str) -> bool {
    error.contains("deprecated pixel format")
        || error.contains("No accelerated colorspace conversion")
        || error.contains("automatically inserted filter")
        || error.contains("Timestamps are unset")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventHandler;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Percentages(Mutex<Vec<f32>>);

    impl EventHandler for Percentages {
        fn handle(&self, event: &Event) {
            if let Event::EncodingProgress { percent, .. } = event {
                self.0.lock().unwrap().push(*percent);
            }
        }
    }

    #[test]
    fn test_percent_complete() {
        assert_eq!(percent_complete(0, 0), 0.0);
        assert_eq!(percent_complete(50, 200), 25.0);
        assert_eq!(percent_complete(250, 200), 100.0);
    }

    #[test]
    fn test_errors_are_buffered() {
        let dispatcher = EventDispatcher::new();
        let mut handler = FfmpegProgressHandler::new(10, &dispatcher);
        handler.handle_event(FfmpegEvent::Error("Unknown encoder 'libx264'".to_string()));
        handler.handle_event(FfmpegEvent::Log(
            FfmpegLogLevel::Info,
            "Input #0, image2".to_string(),
        ));
        handler.handle_event(FfmpegEvent::Log(
            FfmpegLogLevel::Error,
            "Conversion failed!".to_string(),
        ));
        assert!(handler.stderr_buffer().contains("Unknown encoder"));
        assert!(handler.stderr_buffer().contains("Conversion failed!"));
        assert!(!handler.stderr_buffer().contains("Input #0"));
    }

    #[test]
    fn test_progress_reaches_observer() {
        let recorder = Arc::new(Percentages::default());
        let mut dispatcher = EventDispatcher::new();
        dispatcher.add_handler(recorder.clone());

        let mut handler = FfmpegProgressHandler::new(4, &dispatcher);
        for frame in 1..=4 {
            handler.handle_event(FfmpegEvent::Progress(FfmpegProgress {
                frame,
                fps: 10.0,
                q: 0.0,
                size_kb: 0,
                time: "00:00:00.00".to_string(),
                bitrate_kbps: 0.0,
                speed: 1.0,
                raw_log_message: String::new(),
            }));
        }
        assert_eq!(*recorder.0.lock().unwrap(), vec![25.0, 50.0, 75.0, 100.0]);
    }
}
