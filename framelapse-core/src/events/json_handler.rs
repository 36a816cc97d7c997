//! JSON progress handler for structured progress output
//!
//! This module provides a JSON-based event handler that writes one JSON
//! object per line for consumption by scripts wrapping the converter.

use super::{Event, EventHandler};
use serde_json::json;
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Event handler that outputs pipeline events as structured JSON lines
pub struct JsonProgressHandler {
    output: Mutex<Box<dyn Write + Send>>,
}

impl Default for JsonProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonProgressHandler {
    /// Create a new JSON progress handler that writes to stdout
    pub fn new() -> Self {
        Self {
            output: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a new JSON progress handler with a custom writer
    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            output: Mutex::new(writer),
        }
    }

    fn get_timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }

    fn write_json(&self, value: &serde_json::Value) {
        if let Ok(mut output) = self.output.lock() {
            if let Ok(json_str) = serde_json::to_string(value) {
                let _ = writeln!(output, "{json_str}");
                let _ = output.flush();
            }
        }
    }
}

impl EventHandler for JsonProgressHandler {
    fn handle(&self, event: &Event) {
        let timestamp = Self::get_timestamp();

        let value = match event {
            Event::StateChanged { state } => json!({
                "type": "state",
                "state": state.as_str(),
                "timestamp": timestamp
            }),
            Event::ImagesDiscovered {
                archive_members,
                usable_images,
            } => json!({
                "type": "images_discovered",
                "archive_members": archive_members,
                "usable_images": usable_images,
                "timestamp": timestamp
            }),
            Event::GeometryResolved {
                geometry,
                frame_count,
            } => json!({
                "type": "geometry",
                "width": geometry.width,
                "height": geometry.height,
                "frame_count": frame_count,
                "timestamp": timestamp
            }),
            Event::FrameEnhanced { completed, total } => json!({
                "type": "enhancement_progress",
                "stage": "enhancing",
                "completed": completed,
                "total": total,
                "timestamp": timestamp
            }),
            Event::EncodingStarted { total_frames } => json!({
                "type": "encoding_started",
                "total_frames": total_frames,
                "timestamp": timestamp
            }),
            Event::EncodingProgress {
                current_frame,
                total_frames,
                percent,
            } => json!({
                "type": "encoding_progress",
                "stage": "encoding",
                "current_frame": current_frame,
                "total_frames": total_frames,
                "percent": percent,
                "timestamp": timestamp
            }),
            Event::JobCompleted {
                output_path,
                metrics,
            } => json!({
                "type": "completed",
                "output": output_path.display().to_string(),
                "metrics": metrics,
                "timestamp": timestamp
            }),
            Event::JobFailed { message } => json!({
                "type": "error",
                "message": message,
                "timestamp": timestamp
            }),
            Event::Warning { message } => json!({
                "type": "warning",
                "message": message,
                "timestamp": timestamp
            }),
        };

        self.write_json(&value);
    }
}
