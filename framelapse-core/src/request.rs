//! Conversion request model and its validation.
//!
//! A [`ConversionRequest`] is built by the caller (the CLI), validated once
//! with [`ConversionRequest::validate`], and then handed to the pipeline
//! unchanged.

use crate::config::{
    CONTENT_TUNE, DEFAULT_CAPTURE_INTERVAL_SECS, DEFAULT_FRAME_RATE, JPEG_QUALITY_HIGH,
    JPEG_QUALITY_LOW, JPEG_QUALITY_MEDIUM, MAX_CAPTURE_INTERVAL_SECS, MAX_FRAME_RATE,
    MIN_CAPTURE_INTERVAL_SECS, MIN_FRAME_RATE, TIMELAPSE_INTERVAL_THRESHOLD_SECS,
};
use crate::error::{CoreError, CoreResult};

use serde::{Deserialize, Serialize};

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Quality tier selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Low,
    #[default]
    Medium,
    High,
}

/// Encoder settings derived from a quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderSettings {
    pub crf: u8,
    pub preset: &'static str,
    pub tune: &'static str,
}

impl QualityTier {
    /// Parses a tier name. Unrecognized names fall back to `Medium`.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    /// JPEG quality used when re-encoding enhanced frames.
    #[must_use]
    pub const fn jpeg_quality(self) -> u8 {
        match self {
            Self::High => JPEG_QUALITY_HIGH,
            Self::Medium => JPEG_QUALITY_MEDIUM,
            Self::Low => JPEG_QUALITY_LOW,
        }
    }

    /// Constant rate factor and preset for the video encoder.
    #[must_use]
    pub const fn encoder_settings(self) -> EncoderSettings {
        let (crf, preset) = match self {
            Self::High => (18, "slow"),
            Self::Medium => (23, "medium"),
            Self::Low => (28, "fast"),
        };
        EncoderSettings {
            crf,
            preset,
            tune: CONTENT_TUNE,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for QualityTier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(CoreError::Validation(format!(
                "unknown quality tier '{other}'"
            ))),
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transition applied at the start and end of the video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    #[default]
    None,
    Fade,
}

impl Transition {
    /// Parses a transition name. Unrecognized names mean no transition.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("fade") {
            Self::Fade
        } else {
            Self::None
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Fade => "fade",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a finished job is presented. Has no effect on the pipeline itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionKind {
    Video,
    Timelapse,
}

impl ConversionKind {
    #[must_use]
    pub fn from_interval(capture_interval_secs: f64) -> Self {
        if capture_interval_secs > TIMELAPSE_INTERVAL_THRESHOLD_SECS {
            Self::Timelapse
        } else {
            Self::Video
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Video => "Video",
            Self::Timelapse => "Timelapse",
        }
    }
}

/// One archive-to-video conversion job.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub source_archive: PathBuf,
    pub output_path: PathBuf,
    pub frame_rate: u32,
    pub capture_interval_secs: f64,
    pub quality: QualityTier,
    pub stabilize: bool,
    pub transition: Transition,
}

impl ConversionRequest {
    /// Creates a request with the default frame rate, interval and settings.
    #[must_use]
    pub fn new(source_archive: PathBuf, output_path: PathBuf) -> Self {
        Self {
            source_archive,
            output_path,
            frame_rate: DEFAULT_FRAME_RATE,
            capture_interval_secs: DEFAULT_CAPTURE_INTERVAL_SECS,
            quality: QualityTier::default(),
            stabilize: false,
            transition: Transition::default(),
        }
    }

    /// Rejects out-of-range parameters and missing input before any work starts.
    pub fn validate(&self) -> CoreResult<()> {
        if !(MIN_FRAME_RATE..=MAX_FRAME_RATE).contains(&self.frame_rate) {
            return Err(CoreError::Validation(format!(
                "FPS must be between {MIN_FRAME_RATE} and {MAX_FRAME_RATE}"
            )));
        }

        let interval = self.capture_interval_secs;
        if !interval.is_finite()
            || !(MIN_CAPTURE_INTERVAL_SECS..=MAX_CAPTURE_INTERVAL_SECS).contains(&interval)
        {
            return Err(CoreError::Validation(
                "Interval must be between 0.1 seconds and 24 hours".to_string(),
            ));
        }

        if !self.source_archive.is_file() {
            return Err(CoreError::Validation(format!(
                "No input file: {}",
                self.source_archive.display()
            )));
        }

        if self.output_path.as_os_str().is_empty() {
            return Err(CoreError::Validation(
                "An output path is required".to_string(),
            ));
        }

        Ok(())
    }

    #[must_use]
    pub fn kind(&self) -> ConversionKind {
        ConversionKind::from_interval(self.capture_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn request_with_archive() -> (tempfile::TempDir, ConversionRequest) {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("frames.zip");
        File::create(&archive).unwrap();
        let request = ConversionRequest::new(archive, dir.path().join("out.mp4"));
        (dir, request)
    }

    #[test]
    fn test_quality_tier_tables() {
        assert_eq!(QualityTier::High.jpeg_quality(), 95);
        assert_eq!(QualityTier::Medium.jpeg_quality(), 85);
        assert_eq!(QualityTier::Low.jpeg_quality(), 75);

        let low = QualityTier::Low.encoder_settings();
        assert_eq!(low.crf, 28);
        assert_eq!(low.preset, "fast");
        assert_eq!(low.tune, "film");

        let high = QualityTier::High.encoder_settings();
        assert_eq!((high.crf, high.preset), (18, "slow"));
    }

    #[test]
    fn test_unknown_tier_falls_back_to_medium() {
        let tier = QualityTier::parse_lenient("ultra");
        assert_eq!(tier, QualityTier::Medium);
        assert_eq!(tier.jpeg_quality(), 85);
        assert_eq!(tier.encoder_settings().crf, 23);
        assert_eq!(tier.encoder_settings().preset, "medium");
    }

    #[test]
    fn test_strict_tier_parse() {
        assert_eq!("HIGH".parse::<QualityTier>().unwrap(), QualityTier::High);
        assert!("best".parse::<QualityTier>().is_err());
    }

    #[test]
    fn test_transition_parse() {
        assert_eq!(Transition::parse_lenient("fade"), Transition::Fade);
        assert_eq!(Transition::parse_lenient("Fade "), Transition::Fade);
        assert_eq!(Transition::parse_lenient("wipe"), Transition::None);
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(ConversionKind::from_interval(1.0), ConversionKind::Video);
        assert_eq!(ConversionKind::from_interval(0.5), ConversionKind::Video);
        assert_eq!(ConversionKind::from_interval(300.0), ConversionKind::Timelapse);
    }

    #[test]
    fn test_valid_request_passes() {
        let (_dir, request) = request_with_archive();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_frame_rate_bounds() {
        let (_dir, mut request) = request_with_archive();
        request.frame_rate = 0;
        assert!(matches!(request.validate(), Err(CoreError::Validation(_))));
        request.frame_rate = 121;
        assert!(request.validate().is_err());
        request.frame_rate = 120;
        assert!(request.validate().is_ok());
        request.frame_rate = 1;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_interval_bounds() {
        let (_dir, mut request) = request_with_archive();
        request.capture_interval_secs = 0.05;
        assert!(request.validate().is_err());
        request.capture_interval_secs = 86_401.0;
        assert!(request.validate().is_err());
        request.capture_interval_secs = f64::NAN;
        assert!(request.validate().is_err());
        request.capture_interval_secs = 0.1;
        assert!(request.validate().is_ok());
        request.capture_interval_secs = 86_400.0;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_missing_archive_rejected() {
        let request = ConversionRequest::new(
            PathBuf::from("surely/not/here/frames.zip"),
            PathBuf::from("out.mp4"),
        );
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("No input file"));
    }
}
