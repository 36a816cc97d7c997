// ============================================================================
// framelapse-core/src/processing/pipeline.rs
// ============================================================================
//
// PIPELINE ORCHESTRATION: Archive In, Video Out
//
// `Pipeline::convert` runs one conversion job through its stages:
//
//   Created -> Extracting -> Sorting -> ReconcilingGeometry -> Enhancing
//           -> Assembling -> Succeeded
//
// with `Failed` reachable from every non-terminal state. The job's workspace
// is acquired when the job is created and released exactly once when it
// reaches a terminal state, whatever the outcome. A release failure is logged
// and reported as a warning event; it never replaces the job's result.
//
// The pipeline is generic over its three collaborators so tests can run it
// with the mock spawner and fake image processors.

use crate::config::{CoreConfig, MIN_SOURCE_IMAGES};
use crate::discovery::filter_image_files;
use crate::error::{CoreError, CoreResult};
use crate::events::{Event, EventDispatcher};
use crate::external::{
    ArchiveExtractor, FfmpegSpawner, ImageProcessor, SidecarSpawner, StandardImageProcessor,
    ZipArchiveExtractor,
};
use crate::processing::assemble::{AssemblyPlan, run_assembly};
use crate::processing::enhance::enhance_frames;
use crate::processing::geometry::reconcile;
use crate::processing::sequence::sort_sequence;
use crate::processing::timing::TimelapseMetrics;
use crate::request::ConversionRequest;
use crate::workspace::Workspace;

use log::{debug, error, info, warn};
use rayon::ThreadPoolBuilder;

use std::fmt;
use std::fs;
use std::time::Instant;

/// Lifecycle states of a conversion job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Created,
    Extracting,
    Sorting,
    ReconcilingGeometry,
    Enhancing,
    Assembling,
    Succeeded,
    Failed,
}

impl JobState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Extracting => "extracting",
            Self::Sorting => "sorting",
            Self::ReconcilingGeometry => "reconciling_geometry",
            Self::Enhancing => "enhancing",
            Self::Assembling => "assembling",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversion pipeline with injected collaborators.
pub struct Pipeline<S, A, I> {
    config: CoreConfig,
    spawner: S,
    extractor: A,
    images: I,
    dispatcher: EventDispatcher,
}

impl Pipeline<SidecarSpawner, ZipArchiveExtractor, StandardImageProcessor> {
    /// Pipeline using the system ffmpeg, the `zip` crate and the `image` crate.
    #[must_use]
    pub fn standard(config: CoreConfig) -> Self {
        Self::new(
            config,
            SidecarSpawner,
            ZipArchiveExtractor,
            StandardImageProcessor,
        )
    }
}

impl<S, A, I> Pipeline<S, A, I>
where
    S: FfmpegSpawner,
    A: ArchiveExtractor,
    I: ImageProcessor,
{
    pub fn new(config: CoreConfig, spawner: S, extractor: A, images: I) -> Self {
        Self {
            config,
            spawner,
            extractor,
            images,
            dispatcher: EventDispatcher::new(),
        }
    }

    /// Replaces the event dispatcher that receives state and progress events.
    #[must_use]
    pub fn with_dispatcher(mut self, dispatcher: EventDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    #[must_use]
    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Converts the request's archive into a video at its output path.
    ///
    /// Validation happens before any workspace is created. After validation
    /// the workspace directories are always removed before this returns.
    ///
    /// # Errors
    ///
    /// Returns the first stage failure unchanged: `Validation`,
    /// `InsufficientInput`, `Extraction`, `Enhancement` or `Encoding`
    /// (plus `Io`/`Config` for environment problems).
    pub fn convert(&self, request: &ConversionRequest) -> CoreResult<TimelapseMetrics> {
        self.config.validate()?;
        request.validate()?;

        if let Some(parent) = request.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let started = Instant::now();
        let mut state = JobState::Created;
        let workspace = Workspace::acquire(&self.config.temp_dir)?;
        info!(
            "Job {} created for {} -> {}",
            workspace.id(),
            request.source_archive.display(),
            request.output_path.display()
        );
        self.dispatcher.emit(Event::StateChanged { state });

        let result = self.run_stages(request, &workspace, &mut state);

        match &result {
            Ok(metrics) => {
                self.enter(&mut state, JobState::Succeeded);
                info!(
                    "Job {} finished in {:.1}s: {} frames, {}s video",
                    workspace.id(),
                    started.elapsed().as_secs_f64(),
                    metrics.frame_count,
                    metrics.video_duration_seconds
                );
                self.dispatcher.emit(Event::JobCompleted {
                    output_path: request.output_path.clone(),
                    metrics: *metrics,
                });
            }
            Err(e) => {
                error!("Job {} failed while {state}: {e}", workspace.id());
                self.enter(&mut state, JobState::Failed);
                self.dispatcher.emit(Event::JobFailed {
                    message: e.to_string(),
                });
            }
        }

        let id = workspace.id();
        if let Err(cleanup) = workspace.release() {
            warn!("Job {id}: {cleanup}");
            self.dispatcher.emit(Event::Warning {
                message: cleanup.to_string(),
            });
        }

        result
    }

    fn run_stages(
        &self,
        request: &ConversionRequest,
        workspace: &Workspace,
        state: &mut JobState,
    ) -> CoreResult<TimelapseMetrics> {
        self.enter(state, JobState::Extracting);
        let members = self
            .extractor
            .extract(&request.source_archive, workspace.extract_dir())?;
        let mut images = filter_image_files(&self.config, &members);
        info!(
            "Found {} usable image(s) among {} archive member(s)",
            images.len(),
            members.len()
        );
        self.dispatcher.emit(Event::ImagesDiscovered {
            archive_members: members.len(),
            usable_images: images.len(),
        });
        if images.len() < MIN_SOURCE_IMAGES {
            return Err(CoreError::InsufficientInput {
                found: images.len(),
            });
        }

        self.enter(state, JobState::Sorting);
        sort_sequence(&mut images);

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.config.max_workers)
            .thread_name(|i| format!("framelapse-worker-{i}"))
            .build()
            .map_err(|e| CoreError::Config(format!("cannot start worker pool: {e}")))?;
        debug!("Worker pool started with {} threads", self.config.max_workers);

        let processor = &self.images;
        let dispatcher = &self.dispatcher;

        self.enter(state, JobState::ReconcilingGeometry);
        let (frames, geometry) = pool.install(|| reconcile(processor, &images))?;
        info!("Target geometry {geometry} for {} frames", frames.len());
        dispatcher.emit(Event::GeometryResolved {
            geometry,
            frame_count: frames.len(),
        });

        self.enter(state, JobState::Enhancing);
        let frames_dir = workspace.frames_dir();
        let written = pool.install(|| {
            enhance_frames(
                processor,
                &frames,
                geometry,
                request.quality,
                frames_dir,
                dispatcher,
            )
        })?;
        drop(pool);

        self.enter(state, JobState::Assembling);
        let plan = AssemblyPlan {
            frames_dir: frames_dir.to_path_buf(),
            output_path: request.output_path.clone(),
            frame_count: written as u64,
            frame_rate: request.frame_rate,
            quality: request.quality,
            stabilize: request.stabilize,
            transition: request.transition,
        };
        run_assembly(
            &self.spawner,
            &plan,
            self.config.encode_timeout,
            &self.dispatcher,
        )?;

        Ok(TimelapseMetrics::calculate(
            plan.frame_count,
            request.frame_rate,
            request.capture_interval_secs,
            geometry,
        ))
    }

    fn enter(&self, state: &mut JobState, next: JobState) {
        debug_assert!(!state.is_terminal(), "no transitions out of {state}");
        info!("Job state: {state} -> {next}");
        *state = next;
        self.dispatcher.emit(Event::StateChanged { state: next });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(JobState::Succeeded.is_terminal());
        assert!(JobState::Failed.is_terminal());
        assert!(!JobState::Assembling.is_terminal());
        assert!(!JobState::Created.is_terminal());
    }

    #[test]
    fn test_state_names() {
        assert_eq!(JobState::ReconcilingGeometry.to_string(), "reconciling_geometry");
        assert_eq!(JobState::Enhancing.as_str(), "enhancing");
    }
}
