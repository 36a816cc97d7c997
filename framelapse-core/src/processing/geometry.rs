// ============================================================================
// framelapse-core/src/processing/geometry.rs
// ============================================================================
//
// GEOMETRY RECONCILIATION: Choosing One Frame Size for a Whole Job
//
// Source photographs in one archive may differ in size. Every output frame
// must share a single size, and the encoder requires even dimensions. The
// reconciler picks the largest even size no larger than the smallest source
// along each axis, reading only image headers.

use crate::config::{FRAME_INDEX_WIDTH, MIN_SOURCE_IMAGES};
use crate::error::{CoreError, CoreResult};
use crate::external::ImageProcessor;

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use std::fmt;
use std::path::{Path, PathBuf};

/// Common output size for all frames of a job. Both dimensions are even.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetGeometry {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for TargetGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A source image and its position in the output sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFrame {
    pub source_path: PathBuf,
    /// 1-based position in the output sequence.
    pub sequence_index: usize,
    pub decoded_width: u32,
    pub decoded_height: u32,
}

impl ImageFrame {
    /// Name of the processed frame file, e.g. `frame_000001.jpg`.
    #[must_use]
    pub fn frame_file_name(&self) -> String {
        frame_file_name(self.sequence_index)
    }
}

/// Name of the processed frame file for a 1-based sequence index.
#[must_use]
pub fn frame_file_name(sequence_index: usize) -> String {
    format!("frame_{sequence_index:0width$}.jpg", width = FRAME_INDEX_WIDTH)
}

/// Reads every header in `ordered` and computes the shared target geometry.
///
/// Returns the frames (in the given order, with 1-based indices) together with
/// the geometry. Must be called inside the job's rayon pool for the scan to be
/// bounded by the configured worker count.
///
/// # Errors
///
/// - `InsufficientInput` when fewer than two paths are given.
/// - `Enhancement` when a header cannot be read, or when the reconciled size
///   has a zero dimension.
pub fn reconcile<I: ImageProcessor + ?Sized>(
    processor: &I,
    ordered: &[PathBuf],
) -> CoreResult<(Vec<ImageFrame>, TargetGeometry)> {
    if ordered.len() < MIN_SOURCE_IMAGES {
        return Err(CoreError::InsufficientInput {
            found: ordered.len(),
        });
    }

    let frames = ordered
        .par_iter()
        .enumerate()
        .map(|(i, path)| {
            let (width, height) = processor.read_dimensions(path)?;
            Ok(ImageFrame {
                source_path: path.clone(),
                sequence_index: i + 1,
                decoded_width: width,
                decoded_height: height,
            })
        })
        .collect::<CoreResult<Vec<_>>>()?;

    let geometry = target_for(&frames)?;
    debug!(
        "Reconciled {} frames to {geometry} (sources range over {} distinct sizes)",
        frames.len(),
        distinct_sizes(&frames)
    );
    Ok((frames, geometry))
}

/// Computes the target geometry for frames whose dimensions are already known.
pub fn target_for(frames: &[ImageFrame]) -> CoreResult<TargetGeometry> {
    let Some(first) = frames.first() else {
        return Err(CoreError::InsufficientInput { found: 0 });
    };

    let min_width = frames.iter().map(|f| f.decoded_width).min().unwrap_or(0);
    let min_height = frames.iter().map(|f| f.decoded_height).min().unwrap_or(0);

    let geometry = TargetGeometry {
        width: round_down_even(min_width),
        height: round_down_even(min_height),
    };

    if geometry.width == 0 || geometry.height == 0 {
        let smallest = frames
            .iter()
            .min_by_key(|f| f.decoded_width.min(f.decoded_height))
            .map_or(first.source_path.as_path(), |f| f.source_path.as_path());
        return Err(too_small(smallest, min_width, min_height));
    }

    Ok(geometry)
}

fn round_down_even(value: u32) -> u32 {
    value - value % 2
}

fn too_small(path: &Path, width: u32, height: u32) -> CoreError {
    CoreError::Enhancement {
        path: path.to_path_buf(),
        message: format!("common frame size {width}x{height} is too small to encode"),
    }
}

fn distinct_sizes(frames: &[ImageFrame]) -> usize {
    let mut sizes: Vec<(u32, u32)> = frames
        .iter()
        .map(|f| (f.decoded_width, f.decoded_height))
        .collect();
    sizes.sort_unstable();
    sizes.dedup();
    sizes.len()
}
