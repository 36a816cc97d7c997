// ============================================================================
// framelapse-core/src/external/archive.rs
// ============================================================================
//
// ARCHIVE EXTRACTION: Unpacking Source Archives into a Workspace
//
// The pipeline only needs one thing from an archive: every member file
// written somewhere under a destination directory. `ArchiveExtractor` is that
// contract; `ZipArchiveExtractor` implements it with the `zip` crate.

use crate::error::{CoreError, CoreResult};

use log::{debug, warn};
use zip::ZipArchive;

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Unpacks an archive into a destination directory.
pub trait ArchiveExtractor {
    /// Extracts every file member of `archive` below `dest` and returns the
    /// paths of the written files. Directory entries are created but not
    /// returned.
    fn extract(&self, archive: &Path, dest: &Path) -> CoreResult<Vec<PathBuf>>;
}

/// `ArchiveExtractor` for ZIP files.
///
/// Members whose names would resolve outside `dest` (absolute paths or `..`
/// components) are skipped with a warning.
#[derive(Debug, Clone, Default)]
pub struct ZipArchiveExtractor;

impl ArchiveExtractor for ZipArchiveExtractor {
    fn extract(&self, archive: &Path, dest: &Path) -> CoreResult<Vec<PathBuf>> {
        let file = File::open(archive).map_err(|e| {
            CoreError::Extraction(format!("cannot open {}: {e}", archive.display()))
        })?;
        let mut zip = ZipArchive::new(file).map_err(|e| {
            CoreError::Extraction(format!("{} is not a readable ZIP archive: {e}", archive.display()))
        })?;

        let mut written = Vec::with_capacity(zip.len());
        for index in 0..zip.len() {
            let mut entry = zip
                .by_index(index)
                .map_err(|e| CoreError::Extraction(format!("entry {index}: {e}")))?;

            let Some(relative) = entry.enclosed_name() else {
                warn!("Skipping archive entry with unsafe path: {}", entry.name());
                continue;
            };
            let target = dest.join(relative);

            if entry.is_dir() {
                fs::create_dir_all(&target).map_err(|e| unpack_error(&target, &e))?;
                continue;
            }

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| unpack_error(parent, &e))?;
            }
            let mut out = File::create(&target).map_err(|e| unpack_error(&target, &e))?;
            io::copy(&mut entry, &mut out).map_err(|e| {
                CoreError::Extraction(format!("failed to unpack {}: {e}", entry.name()))
            })?;
            written.push(target);
        }

        debug!(
            "Extracted {} file(s) from {} into {}",
            written.len(),
            archive.display(),
            dest.display()
        );
        Ok(written)
    }
}

fn unpack_error(path: &Path, err: &io::Error) -> CoreError {
    CoreError::Extraction(format!("cannot write {}: {err}", path.display()))
}
