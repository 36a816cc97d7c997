// ============================================================================
// framelapse-core/src/processing/enhance.rs
// ============================================================================
//
// FRAME ENHANCEMENT: Producing the Uniform Frame Sequence
//
// Every ordered source image is transformed by the image processor into a
// JPEG of the job's target geometry and written as `frame_%06d.jpg` in the
// processed-frames directory. Frames are independent, so they are processed
// in parallel; the file name carries the order, not completion time.

use crate::error::{CoreError, CoreResult};
use crate::events::{Event, EventDispatcher};
use crate::external::ImageProcessor;
use crate::processing::geometry::{ImageFrame, TargetGeometry};
use crate::request::QualityTier;

use log::debug;
use rayon::prelude::*;

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Transforms and writes every frame. Returns the number of frames written.
///
/// Runs on the current rayon pool; the pipeline installs its bounded job pool
/// before calling this. The first failure stops the remaining work and is
/// returned.
pub fn enhance_frames<I: ImageProcessor + ?Sized>(
    processor: &I,
    frames: &[ImageFrame],
    geometry: TargetGeometry,
    quality: QualityTier,
    frames_dir: &Path,
    dispatcher: &EventDispatcher,
) -> CoreResult<usize> {
    let jpeg_quality = quality.jpeg_quality();
    let total = frames.len();
    let completed = AtomicUsize::new(0);

    frames.par_iter().try_for_each(|frame| -> CoreResult<()> {
        let bytes = processor.transform(&frame.source_path, geometry, jpeg_quality)?;

        let target = frames_dir.join(frame.frame_file_name());
        fs::write(&target, bytes).map_err(|e| CoreError::Enhancement {
            path: frame.source_path.clone(),
            message: format!("cannot write {}: {e}", target.display()),
        })?;

        let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(
            "Enhanced {} -> {} ({done}/{total})",
            frame.source_path.display(),
            target.display()
        );
        dispatcher.emit(Event::FrameEnhanced {
            completed: done,
            total,
        });
        Ok(())
    })?;

    Ok(completed.into_inner())
}
