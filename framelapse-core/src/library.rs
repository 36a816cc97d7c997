// ============================================================================
// framelapse-core/src/library.rs
// ============================================================================
//
// OUTPUT LIBRARY: Finished Videos on Disk
//
// Finished videos live as plain `.mp4` files in the configured output
// directory. This module names new videos, lists existing ones and deletes
// them by file name.

use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};

use chrono::{DateTime, Local};
use log::{debug, info};
use serde::Serialize;
use uuid::Uuid;

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Extension of finished videos.
pub const VIDEO_EXTENSION: &str = "mp4";

/// A finished video in the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoEntry {
    pub filename: String,
    /// Size in bytes.
    pub size: u64,
    pub created: DateTime<Local>,
}

/// Unique name for a new video: `video_<uuid>_<unix millis>.mp4`.
#[must_use]
pub fn output_file_name() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("video_{}_{millis}.{VIDEO_EXTENSION}", Uuid::new_v4())
}

/// Creates the output and temp roots if they do not exist.
pub fn ensure_directories(config: &CoreConfig) -> CoreResult<()> {
    for dir in [&config.output_dir, &config.temp_dir] {
        fs::create_dir_all(dir)?;
        debug!("Directory ready: {}", dir.display());
    }
    Ok(())
}

/// Lists the `.mp4` files in `dir`, newest first.
///
/// A missing directory yields an empty list.
pub fn list_videos(dir: &Path) -> CoreResult<Vec<VideoEntry>> {
    let read_dir = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut videos = Vec::new();
    for entry in read_dir {
        let entry = entry?;
        let path = entry.path();
        let is_video = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(VIDEO_EXTENSION));
        if !is_video {
            continue;
        }

        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }
        // Not every filesystem records creation time.
        let created = metadata.created().or_else(|_| metadata.modified())?;

        videos.push(VideoEntry {
            filename: entry.file_name().to_string_lossy().into_owned(),
            size: metadata.len(),
            created: DateTime::<Local>::from(created),
        });
    }

    videos.sort_by(|a, b| {
        b.created
            .cmp(&a.created)
            .then_with(|| a.filename.cmp(&b.filename))
    });
    Ok(videos)
}

/// Deletes the video `filename` from `dir`.
///
/// # Errors
///
/// - `PathError` when `filename` is not a plain file name.
/// - `VideoNotFound` when no such file exists.
pub fn delete_video(dir: &Path, filename: &str) -> CoreResult<PathBuf> {
    let path = resolve_video_path(dir, filename)?;
    match fs::remove_file(&path) {
        Ok(()) => {
            info!("Deleted video {}", path.display());
            Ok(path)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(CoreError::VideoNotFound(filename.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Joins `filename` onto `dir` after checking it cannot point elsewhere.
pub fn resolve_video_path(dir: &Path, filename: &str) -> CoreResult<PathBuf> {
    let candidate = Path::new(filename);
    let mut components = candidate.components();
    let is_plain = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if filename.is_empty() || !is_plain || filename.contains(['/', '\\']) {
        return Err(CoreError::PathError(format!(
            "'{filename}' is not a plain file name"
        )));
    }
    Ok(dir.join(candidate))
}
