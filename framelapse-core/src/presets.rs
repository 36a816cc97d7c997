//! Named parameter sets for common timelapse subjects.
//!
//! A preset seeds the capture interval, frame rate, quality tier and
//! stabilization of a request. Explicit caller settings override it.

use crate::request::{ConversionRequest, QualityTier};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    /// Identifier used on the command line.
    #[serde(skip)]
    pub key: &'static str,
    /// Human readable name.
    pub name: &'static str,
    #[serde(rename = "intervalSeconds")]
    pub capture_interval_secs: f64,
    #[serde(rename = "fps")]
    pub frame_rate: u32,
    pub quality: QualityTier,
    pub stabilize: bool,
}

/// All presets, in display order.
pub const PRESETS: &[Preset] = &[
    Preset {
        key: "construction",
        name: "Construction Site",
        capture_interval_secs: 300.0,
        frame_rate: 24,
        quality: QualityTier::High,
        stabilize: true,
    },
    Preset {
        key: "sunset",
        name: "Sunset/Sunrise",
        capture_interval_secs: 30.0,
        frame_rate: 30,
        quality: QualityTier::High,
        stabilize: false,
    },
    Preset {
        key: "clouds",
        name: "Cloud Movement",
        capture_interval_secs: 10.0,
        frame_rate: 30,
        quality: QualityTier::Medium,
        stabilize: false,
    },
    Preset {
        key: "flowers",
        name: "Plant Growth",
        capture_interval_secs: 1800.0,
        frame_rate: 25,
        quality: QualityTier::Medium,
        stabilize: false,
    },
    Preset {
        key: "traffic",
        name: "City Traffic",
        capture_interval_secs: 5.0,
        frame_rate: 60,
        quality: QualityTier::Medium,
        stabilize: true,
    },
];

/// Looks up a preset by key, ignoring case.
#[must_use]
pub fn find_preset(key: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.key.eq_ignore_ascii_case(key.trim()))
}

impl Preset {
    /// Copies the preset's settings into `request`.
    pub fn apply_to(&self, request: &mut ConversionRequest) {
        request.capture_interval_secs = self.capture_interval_secs;
        request.frame_rate = self.frame_rate;
        request.quality = self.quality;
        request.stabilize = self.stabilize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_catalogue_contents() {
        let keys: Vec<&str> = PRESETS.iter().map(|p| p.key).collect();
        assert_eq!(keys, ["construction", "sunset", "clouds", "flowers", "traffic"]);
        let traffic = find_preset("TRAFFIC").unwrap();
        assert_eq!(traffic.frame_rate, 60);
        assert!(traffic.stabilize);
        assert!(find_preset("fireworks").is_none());
    }

    #[test]
    fn test_apply_to_request() {
        let mut request = ConversionRequest::new(PathBuf::from("a.zip"), PathBuf::from("b.mp4"));
        find_preset("construction").unwrap().apply_to(&mut request);
        assert_eq!(request.capture_interval_secs, 300.0);
        assert_eq!(request.frame_rate, 24);
        assert_eq!(request.quality, QualityTier::High);
        assert!(request.stabilize);
    }

    #[test]
    fn test_presets_are_valid_requests() {
        for preset in PRESETS {
            assert!((1..=120).contains(&preset.frame_rate), "{}", preset.key);
            assert!(preset.capture_interval_secs >= 0.1);
        }
    }

    #[test]
    fn test_serialized_names() {
        let json = serde_json::to_value(find_preset("sunset").unwrap()).unwrap();
        assert_eq!(json["name"], "Sunset/Sunrise");
        assert_eq!(json["intervalSeconds"], 30.0);
        assert_eq!(json["fps"], 30);
        assert_eq!(json["quality"], "high");
        assert!(json.get("key").is_none());
    }
}
