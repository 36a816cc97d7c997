// ============================================================================
// framelapse-core/src/processing/adjustments.rs
// ============================================================================
//
// FRAME ADJUSTMENTS: Pixel Operations Applied to Every Frame
//
// Pure functions over decoded images. They are composed by
// `StandardImageProcessor::transform` in this order: crop-to-fill, levels
// normalization, sharpening.

use crate::config::{
    NORMALIZE_HIGH_PERCENTILE, NORMALIZE_LOW_PERCENTILE, SHARPEN_SIGMA, SHARPEN_THRESHOLD,
};
use crate::processing::geometry::TargetGeometry;

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};

/// Resizes `image` to cover `geometry` and crops the overflow evenly from
/// both sides, so the output is exactly `geometry` with the center preserved.
#[must_use]
pub fn crop_to_fill(image: &DynamicImage, geometry: TargetGeometry) -> RgbImage {
    image
        .resize_to_fill(geometry.width, geometry.height, FilterType::Lanczos3)
        .to_rgb8()
}

/// Stretches the image's levels so the darkest and brightest percentiles of
/// the luminance histogram map to black and white.
///
/// Images whose low and high percentiles coincide (flat images) are left
/// untouched.
pub fn normalize_levels(image: &mut RgbImage) {
    let Some((low, high)) = luminance_bounds(image) else {
        return;
    };
    if high <= low {
        return;
    }

    let range = f32::from(high - low);
    let mut lut = [0u8; 256];
    for (value, slot) in lut.iter_mut().enumerate() {
        let stretched = (value as f32 - f32::from(low)) * 255.0 / range;
        *slot = stretched.round().clamp(0.0, 255.0) as u8;
    }

    for pixel in image.pixels_mut() {
        for channel in &mut pixel.0 {
            *channel = lut[usize::from(*channel)];
        }
    }
}

/// Applies a mild unsharp mask.
#[must_use]
pub fn sharpen(image: &RgbImage) -> RgbImage {
    imageops::unsharpen(image, SHARPEN_SIGMA, SHARPEN_THRESHOLD)
}

/// Luminance values at the configured low and high percentiles.
fn luminance_bounds(image: &RgbImage) -> Option<(u8, u8)> {
    let total = u64::from(image.width()) * u64::from(image.height());
    if total == 0 {
        return None;
    }

    let mut histogram = [0u64; 256];
    for pixel in image.pixels() {
        histogram[usize::from(luminance(pixel.0))] += 1;
    }

    let low_target = (total as f64 * NORMALIZE_LOW_PERCENTILE).floor() as u64;
    let high_target = (total as f64 * NORMALIZE_HIGH_PERCENTILE).ceil() as u64;

    let mut low = None;
    let mut high = 255u8;
    let mut seen = 0u64;
    for (value, count) in histogram.iter().enumerate() {
        seen += count;
        if low.is_none() && seen > low_target {
            low = Some(value as u8);
        }
        if seen >= high_target {
            high = value as u8;
            break;
        }
    }

    low.map(|l| (l, high))
}

/// Rec. 601 luma.
fn luminance([r, g, b]: [u8; 3]) -> u8 {
    let y = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
    (y / 1000) as u8
}
