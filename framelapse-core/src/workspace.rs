//! Per-job temporary workspace management.
//!
//! A [`Workspace`] is the pair of directories one conversion job works in:
//! an extraction area for the unpacked archive and a processed-frames area
//! for the enhanced frames the encoder reads. Each workspace carries a fresh
//! UUID so concurrent jobs never share directories.
//!
//! Acquisition and release are explicit calls made by the pipeline
//! orchestrator. Dropping a `Workspace` does not delete anything.

use crate::error::{CoreError, CoreResult};

use log::debug;
use uuid::Uuid;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Temporary directories owned by a single conversion job.
#[derive(Debug)]
pub struct Workspace {
    id: Uuid,
    extract_dir: PathBuf,
    frames_dir: PathBuf,
}

impl Workspace {
    /// Creates both workspace directories under `temp_root`.
    ///
    /// If the second directory cannot be created the first one is removed
    /// again before the error is returned.
    pub fn acquire(temp_root: &Path) -> CoreResult<Self> {
        fs::create_dir_all(temp_root)?;

        let id = Uuid::new_v4();
        let extract_dir = temp_root.join(format!("extract_{id}"));
        let frames_dir = temp_root.join(format!("process_{id}"));

        fs::create_dir(&extract_dir)?;
        if let Err(e) = fs::create_dir(&frames_dir) {
            let _ = fs::remove_dir_all(&extract_dir);
            return Err(e.into());
        }

        debug!("Acquired workspace {id} under {}", temp_root.display());
        Ok(Self {
            id,
            extract_dir,
            frames_dir,
        })
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Directory the archive is unpacked into.
    #[must_use]
    pub fn extract_dir(&self) -> &Path {
        &self.extract_dir
    }

    /// Directory holding the enhanced, sequence-numbered frames.
    #[must_use]
    pub fn frames_dir(&self) -> &Path {
        &self.frames_dir
    }

    /// Deletes both directories and everything in them.
    ///
    /// Both removals are always attempted. The first failure is returned as
    /// [`CoreError::Cleanup`]; a directory that is already gone is not an error.
    pub fn release(self) -> CoreResult<()> {
        let mut first_error = None;

        for dir in [&self.extract_dir, &self.frames_dir] {
            match fs::remove_dir_all(dir) {
                Ok(()) => debug!("Removed workspace directory {}", dir.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(CoreError::Cleanup {
                            path: dir.clone(),
                            message: e.to_string(),
                        });
                    }
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_acquire_creates_both_directories() {
        let root = tempdir().unwrap();
        let ws = Workspace::acquire(root.path()).unwrap();
        assert!(ws.extract_dir().is_dir());
        assert!(ws.frames_dir().is_dir());
        assert!(ws.extract_dir().starts_with(root.path()));
        assert!(
            ws.extract_dir()
                .to_string_lossy()
                .contains(&ws.id().to_string())
        );
        ws.release().unwrap();
    }

    #[test]
    fn test_workspaces_are_unique() {
        let root = tempdir().unwrap();
        let a = Workspace::acquire(root.path()).unwrap();
        let b = Workspace::acquire(root.path()).unwrap();
        assert_ne!(a.id(), b.id());
        assert_ne!(a.extract_dir(), b.extract_dir());
        assert_ne!(a.frames_dir(), b.frames_dir());
        a.release().unwrap();
        b.release().unwrap();
    }

    #[test]
    fn test_release_removes_contents() {
        let root = tempdir().unwrap();
        let ws = Workspace::acquire(root.path()).unwrap();
        let extract = ws.extract_dir().to_path_buf();
        let frames = ws.frames_dir().to_path_buf();

        fs::create_dir_all(extract.join("nested")).unwrap();
        fs::write(extract.join("nested").join("a.jpg"), b"x").unwrap();
        fs::write(frames.join("frame_000001.jpg"), b"y").unwrap();

        ws.release().unwrap();
        assert!(!extract.exists());
        assert!(!frames.exists());
    }

    #[test]
    fn test_release_tolerates_missing_directories() {
        let root = tempdir().unwrap();
        let ws = Workspace::acquire(root.path()).unwrap();
        fs::remove_dir_all(ws.frames_dir()).unwrap();
        assert!(ws.release().is_ok());
    }

    #[test]
    fn test_acquire_creates_missing_root() {
        let root = tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        let ws = Workspace::acquire(&nested).unwrap();
        assert!(nested.is_dir());
        ws.release().unwrap();
    }
}
