//! Source image discovery.
//!
//! Filters the member paths produced by archive extraction down to files the
//! pipeline can use as frames: regular files with an accepted image extension
//! that are not hidden entries or archive metadata (such as the `__MACOSX`
//! resource forks macOS adds to ZIP files).

use crate::config::CoreConfig;

use std::path::{Component, Path, PathBuf};

/// Directory names whose contents are never treated as images.
const IGNORED_DIRECTORIES: &[&str] = &["__MACOSX"];

/// Returns the subset of `members` that are usable source images.
///
/// The result keeps the input order; ordering into a shooting sequence is the
/// job of [`crate::processing::sequence`].
///
/// # Examples
///
/// ```rust
/// use framelapse_core::CoreConfig;
/// use framelapse_core::discovery::filter_image_files;
/// use std::path::PathBuf;
///
/// let members = vec![
///     PathBuf::from("/ws/img_1.JPG"),
///     PathBuf::from("/ws/notes.txt"),
///     PathBuf::from("/ws/.img_2.jpg"),
/// ];
/// let images = filter_image_files(&CoreConfig::default(), &members);
/// assert_eq!(images, vec![PathBuf::from("/ws/img_1.JPG")]);
/// ```
#[must_use]
pub fn filter_image_files(config: &CoreConfig, members: &[PathBuf]) -> Vec<PathBuf> {
    members
        .iter()
        .filter(|path| is_candidate_image(config, path))
        .cloned()
        .collect()
}

/// Checks name and extension only; existence is the caller's concern.
#[must_use]
pub fn is_candidate_image(config: &CoreConfig, path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.starts_with('.') {
        return false;
    }

    let in_ignored_dir = path.components().any(|component| match component {
        Component::Normal(part) => IGNORED_DIRECTORIES
            .iter()
            .any(|ignored| part == std::ffi::OsStr::new(ignored)),
        _ => false,
    });
    if in_ignored_dir {
        return false;
    }

    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| config.accepts_extension(ext))
}
