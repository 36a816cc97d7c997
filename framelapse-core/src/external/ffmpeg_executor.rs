// ============================================================================
// framelapse-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// ENCODER PROCESS SEAM
//
// The video assembler starts ffmpeg through `FfmpegSpawner` and reads its
// progress through `FfmpegProcess`. Production uses ffmpeg-sidecar; tests
// plug in the mock spawner.

use crate::error::{CoreResult, command_failed_error, command_start_error, command_wait_error};
use ffmpeg_sidecar::child::FfmpegChild as SidecarChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::process::ExitStatus;

/// A running encoder.
pub trait FfmpegProcess {
    /// Feeds every encoder event to `handler` until the stream ends.
    ///
    /// An error from `handler` stops reading and is returned as is. The
    /// process itself keeps running until waited on or killed.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    fn wait(&mut self) -> CoreResult<ExitStatus>;

    /// Used when the encode timeout expires.
    fn kill(&mut self) -> CoreResult<()>;
}

/// Starts encoder processes.
pub trait FfmpegSpawner {
    type Process: FfmpegProcess;
    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

pub struct SidecarProcess(SidecarChild);

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let iterator = self.0.iter().map_err(|e| {
            log::error!("Cannot read encoder output: {e}");
            command_failed_error(
                "ffmpeg (event stream)",
                ExitStatus::default(),
                e.to_string(),
            )
        })?;
        for event in iterator {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0
            .wait()
            .map_err(|e| command_wait_error("ffmpeg (sidecar)", e))
    }

    fn kill(&mut self) -> CoreResult<()> {
        self.0
            .kill()
            .map_err(|e| command_wait_error("ffmpeg (kill)", e))
    }
}

/// Spawner for the system ffmpeg binary.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        cmd.spawn()
            .map(SidecarProcess)
            .map_err(|e| command_start_error("ffmpeg (sidecar)", e))
    }
}
