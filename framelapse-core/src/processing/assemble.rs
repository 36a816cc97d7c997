// ============================================================================
// framelapse-core/src/processing/assemble.rs
// ============================================================================
//
// VIDEO ASSEMBLY: Encoding the Frame Sequence with FFmpeg
//
// Translates an `AssemblyPlan` into ffmpeg arguments, runs the encoder
// through an `FfmpegSpawner`, forwards its progress, and guarantees that a
// failed encode leaves no partial output file behind.
//
// KEY COMPONENTS:
// - AssemblyPlan: everything the encoder needs for one job
// - build_encode_args: pure argument construction (tested without ffmpeg)
// - run_assembly: process lifecycle, timeout and failure handling

use crate::config::{
    DESHAKE_FILTER, FADE_FRACTION, FRAME_FILE_PATTERN, MAX_FADE_FRAMES, MOVFLAGS, PIXEL_FORMAT,
    VIDEO_CODEC,
};
use crate::error::{CoreError, CoreResult, command_failed_error};
use crate::events::{Event, EventDispatcher};
use crate::external::{FfmpegCommandBuilder, FfmpegProcess, FfmpegSpawner, VideoFilterChain};
use crate::processing::progress::FfmpegProgressHandler;
use crate::request::{QualityTier, Transition};

use log::{debug, info, warn};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Inputs of one encoder run.
#[derive(Debug, Clone)]
pub struct AssemblyPlan {
    pub frames_dir: PathBuf,
    pub output_path: PathBuf,
    pub frame_count: u64,
    pub frame_rate: u32,
    pub quality: QualityTier,
    pub stabilize: bool,
    pub transition: Transition,
}

/// Length in frames of each fade: 5% of the video, at most 30 frames.
#[must_use]
pub fn fade_frames(frame_count: u64) -> u64 {
    let by_fraction = (frame_count as f64 * FADE_FRACTION).floor() as u64;
    by_fraction.min(u64::from(MAX_FADE_FRAMES))
}

/// Fade-in plus fade-out filter, or `None` when the video is too short for a
/// fade of at least one frame.
#[must_use]
pub fn fade_filter(frame_count: u64) -> Option<String> {
    let length = fade_frames(frame_count);
    if length == 0 {
        return None;
    }
    let out_start = frame_count - length;
    Some(format!("fade=in:0:{length},fade=out:{out_start}:{length}"))
}

/// Video filter chain for the plan: stabilization first, then transitions.
#[must_use]
pub fn build_filter_chain(plan: &AssemblyPlan) -> Option<String> {
    let mut chain = VideoFilterChain::new();
    if plan.stabilize {
        chain = chain.add_filter(DESHAKE_FILTER);
    }
    if plan.transition == Transition::Fade {
        chain = chain.add_optional(fade_filter(plan.frame_count));
    }
    chain.build()
}

/// Encoder arguments for the plan, without the common `-hide_banner -y` prefix.
#[must_use]
pub fn build_encode_args(plan: &AssemblyPlan) -> Vec<String> {
    let settings = plan.quality.encoder_settings();
    let fps = plan.frame_rate.to_string();
    let input = plan.frames_dir.join(FRAME_FILE_PATTERN);

    let mut args = vec![
        "-framerate".to_string(),
        fps.clone(),
        "-i".to_string(),
        input.to_string_lossy().into_owned(),
    ];

    if let Some(filters) = build_filter_chain(plan) {
        args.push("-vf".to_string());
        args.push(filters);
    }

    args.extend([
        "-c:v".to_string(),
        VIDEO_CODEC.to_string(),
        "-crf".to_string(),
        settings.crf.to_string(),
        "-preset".to_string(),
        settings.preset.to_string(),
        "-pix_fmt".to_string(),
        PIXEL_FORMAT.to_string(),
        "-movflags".to_string(),
        MOVFLAGS.to_string(),
        "-tune".to_string(),
        settings.tune.to_string(),
        "-r".to_string(),
        fps,
        plan.output_path.to_string_lossy().into_owned(),
    ]);

    args
}

/// Runs the encoder for `plan`.
///
/// With `timeout` set, the elapsed time is checked on every encoder event and
/// the process is killed once the limit is exceeded.
///
/// # Errors
///
/// Every failure is reported as [`CoreError::Encoding`] carrying the
/// encoder's diagnostics. The output file is removed before returning.
pub fn run_assembly<S: FfmpegSpawner>(
    spawner: &S,
    plan: &AssemblyPlan,
    timeout: Option<Duration>,
    dispatcher: &EventDispatcher,
) -> CoreResult<()> {
    let args = build_encode_args(plan);
    debug!("ffmpeg arguments: {}", args.join(" "));

    let cmd = FfmpegCommandBuilder::new().build_with_args(&args);
    info!(
        "Encoding {} frames at {} fps (quality {}, stabilize {}, transition {})",
        plan.frame_count, plan.frame_rate, plan.quality, plan.stabilize, plan.transition
    );
    dispatcher.emit(Event::EncodingStarted {
        total_frames: plan.frame_count,
    });

    let mut process = match spawner.spawn(cmd) {
        Ok(process) => process,
        Err(e) => return Err(fail(plan, e)),
    };

    let mut handler = FfmpegProgressHandler::new(plan.frame_count, dispatcher);
    let started = Instant::now();
    let events = process.handle_events(|event| {
        handler.handle_event(event);
        match timeout {
            Some(limit) if started.elapsed() > limit => Err(CoreError::Encoding(format!(
                "encoder exceeded the {}s time limit",
                limit.as_secs_f64()
            ))),
            _ => Ok(()),
        }
    });

    if let Err(e) = events {
        warn!("Stopping encoder: {e}");
        if let Err(kill_err) = process.kill() {
            warn!("Failed to kill encoder: {kill_err}");
        }
        let _ = process.wait();
        return Err(fail(plan, e));
    }

    let status = match process.wait() {
        Ok(status) => status,
        Err(e) => return Err(fail(plan, e)),
    };

    if !status.success() {
        let stderr = handler.stderr_buffer().trim().to_string();
        return Err(fail(plan, command_failed_error("ffmpeg", status, stderr)));
    }

    if !plan.output_path.is_file() {
        return Err(fail(
            plan,
            CoreError::Encoding("encoder finished without writing an output file".to_string()),
        ));
    }

    info!(
        "Encoded {} in {:.1}s",
        plan.output_path.display(),
        handler.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Removes any partial output and converts `err` into an encoding error.
fn fail(plan: &AssemblyPlan, err: CoreError) -> CoreError {
    remove_partial_output(&plan.output_path);
    match err {
        CoreError::Encoding(_) => err,
        other => CoreError::Encoding(other.to_string()),
    }
}

fn remove_partial_output(path: &Path) {
    if path.exists() {
        match fs::remove_file(path) {
            Ok(()) => debug!("Removed partial output {}", path.display()),
            Err(e) => warn!("Failed to remove partial output {}: {e}", path.display()),
        }
    }
}
