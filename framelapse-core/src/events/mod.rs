//! Pipeline events and their dispatch.
//!
//! The conversion pipeline reports what it is doing by emitting [`Event`]s
//! through an [`EventDispatcher`]. Handlers decide what to do with them: the
//! CLI draws a progress bar, [`crate::file_logging::FileLoggingHandler`]
//! writes log lines, [`json_handler::JsonProgressHandler`] streams JSON.
//! Events are informational only; nothing a handler does affects the job.

use std::path::PathBuf;
use std::sync::Arc;

use crate::processing::geometry::TargetGeometry;
use crate::processing::pipeline::JobState;
use crate::processing::timing::TimelapseMetrics;

pub mod json_handler;

#[derive(Debug, Clone)]
pub enum Event {
    /// The job entered a new state.
    StateChanged {
        state: JobState,
    },

    // Analysis events
    ImagesDiscovered {
        archive_members: usize,
        usable_images: usize,
    },
    GeometryResolved {
        geometry: TargetGeometry,
        frame_count: usize,
    },

    // Enhancement events
    FrameEnhanced {
        completed: usize,
        total: usize,
    },

    // Encoding events
    EncodingStarted {
        total_frames: u64,
    },
    EncodingProgress {
        current_frame: u64,
        total_frames: u64,
        percent: f32,
    },

    // Outcome events
    JobCompleted {
        output_path: PathBuf,
        metrics: TimelapseMetrics,
    },
    JobFailed {
        message: String,
    },

    Warning {
        message: String,
    },
}

pub trait EventHandler: Send + Sync {
    fn handle(&self, event: &Event);
}

#[derive(Clone)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    pub fn emit(&self, event: Event) {
        for handler in &self.handlers {
            handler.handle(&event);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
