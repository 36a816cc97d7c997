//! Timing metadata for a finished conversion.
//!
//! Pure arithmetic: how long the video plays, how much real time the source
//! photographs span, and how much faster than real time the video runs.

use crate::processing::geometry::TargetGeometry;

use serde::{Deserialize, Serialize};

/// Result metadata of a successful conversion.
///
/// Serialized with the field names callers of the conversion service expect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelapseMetrics {
    #[serde(rename = "frameCount")]
    pub frame_count: u64,
    /// Playback length in seconds, rounded to two decimals.
    #[serde(rename = "duration")]
    pub video_duration_seconds: f64,
    /// Real-world time covered by the photographs, in whole seconds.
    #[serde(rename = "realDuration")]
    pub real_duration_seconds: u64,
    #[serde(rename = "speedupFactor")]
    pub speedup_factor: u64,
    #[serde(rename = "fps")]
    pub frame_rate: u32,
    #[serde(rename = "dimensions")]
    pub geometry: TargetGeometry,
}

impl TimelapseMetrics {
    /// Derives the metrics for `frame_count` frames shot `capture_interval_secs`
    /// apart and played back at `frame_rate`.
    ///
    /// `frame_rate` must be non-zero; request validation guarantees this.
    #[must_use]
    pub fn calculate(
        frame_count: u64,
        frame_rate: u32,
        capture_interval_secs: f64,
        geometry: TargetGeometry,
    ) -> Self {
        let frames = frame_count as f64;
        let real_exact = frames * capture_interval_secs;
        let video_exact = frames / f64::from(frame_rate);

        let speedup = if video_exact > 0.0 {
            (real_exact / video_exact).round()
        } else {
            0.0
        };

        Self {
            frame_count,
            video_duration_seconds: round_to_hundredths(video_exact),
            real_duration_seconds: real_exact.round() as u64,
            speedup_factor: speedup as u64,
            frame_rate,
            geometry,
        }
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const GEOMETRY: TargetGeometry = TargetGeometry {
        width: 1920,
        height: 1080,
    };

    #[test]
    fn test_long_interval_timelapse() {
        let m = TimelapseMetrics::calculate(100, 25, 300.0, GEOMETRY);
        assert!((m.video_duration_seconds - 4.0).abs() < f64::EPSILON);
        assert_eq!(m.real_duration_seconds, 30_000);
        assert_eq!(m.speedup_factor, 7_500);
    }

    #[test]
    fn test_one_second_interval() {
        let m = TimelapseMetrics::calculate(50, 25, 1.0, GEOMETRY);
        assert!((m.video_duration_seconds - 2.0).abs() < f64::EPSILON);
        assert_eq!(m.real_duration_seconds, 50);
        assert_eq!(m.speedup_factor, 25);
    }

    #[test]
    fn test_duration_rounded_to_two_decimals() {
        let m = TimelapseMetrics::calculate(10, 3, 1.0, GEOMETRY);
        assert!((m.video_duration_seconds - 3.33).abs() < 1e-9);
    }

    #[test]
    fn test_fractional_interval_rounds_real_duration() {
        let m = TimelapseMetrics::calculate(3, 30, 0.5, GEOMETRY);
        assert_eq!(m.real_duration_seconds, 2);
        assert_eq!(m.speedup_factor, 15);
    }

    #[test]
    fn test_serialized_field_names() {
        let m = TimelapseMetrics::calculate(100, 25, 300.0, GEOMETRY);
        let json = serde_json::to_value(m).unwrap();
        assert_eq!(json["frameCount"], 100);
        assert_eq!(json["realDuration"], 30_000);
        assert_eq!(json["speedupFactor"], 7_500);
        assert_eq!(json["fps"], 25);
        assert_eq!(json["dimensions"]["width"], 1920);
        assert_eq!(json["dimensions"]["height"], 1080);
        assert_eq!(json["duration"], 4.0);
    }
}
