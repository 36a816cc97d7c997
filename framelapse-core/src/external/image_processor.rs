// ============================================================================
// framelapse-core/src/external/image_processor.rs
// ============================================================================
//
// IMAGE PROCESSING: Decoding, Adjusting and Re-encoding Source Images
//
// `ImageProcessor` is the seam between the pipeline and the image codec
// library. It is called concurrently from the job's worker pool, hence the
// `Send + Sync` bound.

use crate::error::{CoreError, CoreResult};
use crate::processing::adjustments::{crop_to_fill, normalize_levels, sharpen};
use crate::processing::geometry::TargetGeometry;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageReader};

use std::path::Path;

/// Image decode/transform/encode capability.
pub trait ImageProcessor: Send + Sync {
    /// Returns `(width, height)` of the image, reading as little as possible.
    fn read_dimensions(&self, path: &Path) -> CoreResult<(u32, u32)>;

    /// Decodes `path`, fits it to `geometry`, applies the enhancement passes
    /// and returns JPEG bytes encoded at `jpeg_quality` (1-100).
    fn transform(
        &self,
        path: &Path,
        geometry: TargetGeometry,
        jpeg_quality: u8,
    ) -> CoreResult<Vec<u8>>;
}

/// `ImageProcessor` backed by the `image` crate.
#[derive(Debug, Clone, Default)]
pub struct StandardImageProcessor;

impl ImageProcessor for StandardImageProcessor {
    fn read_dimensions(&self, path: &Path) -> CoreResult<(u32, u32)> {
        // Sniff the content like `transform` does; extensions can lie.
        ImageReader::open(path)
            .map_err(|e| enhancement_error(path, &e))?
            .with_guessed_format()
            .map_err(|e| enhancement_error(path, &e))?
            .into_dimensions()
            .map_err(|e| enhancement_error(path, &e))
    }

    fn transform(
        &self,
        path: &Path,
        geometry: TargetGeometry,
        jpeg_quality: u8,
    ) -> CoreResult<Vec<u8>> {
        let decoded = ImageReader::open(path)
            .map_err(|e| enhancement_error(path, &e))?
            .with_guessed_format()
            .map_err(|e| enhancement_error(path, &e))?
            .decode()
            .map_err(|e| enhancement_error(path, &e))?;

        let mut frame = crop_to_fill(&decoded, geometry);
        normalize_levels(&mut frame);
        let frame = sharpen(&frame);

        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, jpeg_quality)
            .write_image(
                frame.as_raw(),
                frame.width(),
                frame.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| enhancement_error(path, &e))?;
        Ok(bytes)
    }
}

fn enhancement_error(path: &Path, err: &dyn std::fmt::Display) -> CoreError {
    CoreError::Enhancement {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
