//! Directory traversal yielding qualifying directories.
//!
//! Visits the root and every directory beneath it once, depth-first with
//! siblings sorted by name. Symlinks are not followed. A directory that
//! cannot be read is logged and skipped; traversal continues with its
//! siblings.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::core::predicate::MarkerFiles;

/// Lazy iterator over directories whose immediate files satisfy [`MarkerFiles`].
///
/// The predicate is evaluated when the walk reaches a directory, so files
/// created by processing an earlier match are seen by later ones.
pub struct QualifyingDirs {
    walker: walkdir::IntoIter,
    markers: MarkerFiles,
}

impl QualifyingDirs {
    pub fn new(root: &Path, markers: MarkerFiles) -> Self {
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();
        Self { walker, markers }
    }
}

impl Iterator for QualifyingDirs {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(err = %err, "skipping unreadable path");
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }
            let names = match file_names(entry.path()) {
                Ok(names) => names,
                Err(err) => {
                    warn!(dir = %entry.path().display(), err = %err, "skipping unreadable directory");
                    continue;
                }
            };
            if self.markers.qualifies(&names) {
                debug!(dir = %entry.path().display(), "directory qualifies");
                return Some(entry.into_path());
            }
        }
    }
}

/// Names of the non-directory entries directly inside `dir`.
///
/// Symlinks count as files unless they point at a directory.
fn file_names(dir: &Path) -> io::Result<Vec<std::ffi::OsString>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let is_dir = if file_type.is_symlink() {
            entry.path().is_dir()
        } else {
            file_type.is_dir()
        };
        if !is_dir {
            names.push(entry.file_name());
        }
    }
    Ok(names)
}
