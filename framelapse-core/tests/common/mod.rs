// framelapse-core/tests/common/mod.rs
//
// Shared fixtures for the integration tests: real images, ZIP archives and
// fake collaborators.

#![allow(dead_code)]

use framelapse_core::error::{CoreError, CoreResult};
use framelapse_core::events::{Event, EventHandler};
use framelapse_core::external::ImageProcessor;
use framelapse_core::{CoreConfig, CoreConfigBuilder, JobState, TargetGeometry};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use zip::write::SimpleFileOptions;

/// PNG bytes of a `width` x `height` gradient.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 96])
    });
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("encode png");
    bytes
}

/// Writes a ZIP archive at `path` with the given members.
pub fn write_archive(path: &Path, members: &[(&str, Vec<u8>)]) {
    let file = File::create(path).expect("create archive");
    let mut writer = zip::ZipWriter::new(file);
    for (name, data) in members {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("start member");
        writer.write_all(data).expect("write member");
    }
    writer.finish().expect("finish archive");
}

/// Archive of real PNG images with the given names and sizes.
pub fn image_archive(path: &Path, images: &[(&str, u32, u32)]) {
    let members: Vec<(&str, Vec<u8>)> = images
        .iter()
        .map(|(name, w, h)| (*name, png_bytes(*w, *h)))
        .collect();
    write_archive(path, &members);
}

/// Config rooted in `root` with two workers.
pub fn test_config(root: &Path) -> CoreConfig {
    CoreConfigBuilder::new()
        .temp_dir(root.join("temp"))
        .output_dir(root.join("outputs"))
        .max_workers(2)
        .build()
}

/// Entries left under the temp root (workspace leftovers).
pub fn temp_leftovers(config: &CoreConfig) -> Vec<PathBuf> {
    match fs::read_dir(&config.temp_dir) {
        Ok(entries) => entries.filter_map(Result::ok).map(|e| e.path()).collect(),
        Err(_) => Vec::new(),
    }
}

/// Records every event it sees.
#[derive(Default)]
pub struct RecordingHandler {
    pub events: Mutex<Vec<Event>>,
}

impl RecordingHandler {
    pub fn states(&self) -> Vec<JobState> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                Event::StateChanged { state } => Some(*state),
                _ => None,
            })
            .collect()
    }

    pub fn count<F: Fn(&Event) -> bool>(&self, predicate: F) -> usize {
        self.events.lock().unwrap().iter().filter(|e| predicate(e)).count()
    }
}

impl EventHandler for RecordingHandler {
    fn handle(&self, event: &Event) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Image processor answering from a table of sizes, without decoding.
///
/// `transform` returns placeholder bytes and fails for any file whose name
/// contains `fail_on`.
#[derive(Default)]
pub struct FakeImages {
    pub sizes: HashMap<String, (u32, u32)>,
    pub fail_on: Option<String>,
    pub transformed: Mutex<Vec<(String, TargetGeometry, u8)>>,
}

impl FakeImages {
    pub fn with_sizes(sizes: &[(&str, u32, u32)]) -> Self {
        Self {
            sizes: sizes
                .iter()
                .map(|(name, w, h)| ((*name).to_string(), (*w, *h)))
                .collect(),
            ..Self::default()
        }
    }

    fn name_of(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl ImageProcessor for FakeImages {
    fn read_dimensions(&self, path: &Path) -> CoreResult<(u32, u32)> {
        self.sizes
            .get(&Self::name_of(path))
            .copied()
            .ok_or_else(|| CoreError::Enhancement {
                path: path.to_path_buf(),
                message: "unknown fixture".to_string(),
            })
    }

    fn transform(
        &self,
        path: &Path,
        geometry: TargetGeometry,
        jpeg_quality: u8,
    ) -> CoreResult<Vec<u8>> {
        let name = Self::name_of(path);
        if self.fail_on.as_deref().is_some_and(|f| name.contains(f)) {
            return Err(CoreError::Enhancement {
                path: path.to_path_buf(),
                message: "simulated decode failure".to_string(),
            });
        }
        self.transformed
            .lock()
            .unwrap()
            .push((name, geometry, jpeg_quality));
        Ok(b"jpeg".to_vec())
    }
}
