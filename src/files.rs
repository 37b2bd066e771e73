//! Locating the phrase and progress files.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::FlywheelError;

/// How deep below the search root a data file may sit.
pub const SEARCH_MAX_DEPTH: usize = 6;

/// Resolve `name` to an existing file, creating an empty one if needed.
///
/// 1. `name` as given (relative to the working directory, or absolute).
/// 2. The first match, in file-name order, of a recursive search under
///    `search_root` (the working directory when `None`) for a path ending
///    with `name`. Only relative names are searched for.
/// 3. Otherwise an empty file is created at `name`, parents included.
pub fn find_or_create_file(
    name: &Path,
    search_root: Option<&Path>,
) -> Result<PathBuf, FlywheelError> {
    if name.is_file() {
        return Ok(name.to_path_buf());
    }

    if name.is_relative() {
        let root = search_root.unwrap_or_else(|| Path::new("."));
        if let Some(found) = search(root, name) {
            info!(file = %found.display(), "data_file_found");
            return Ok(found);
        }
    }

    create_empty(name)?;
    info!(file = %name.display(), "data_file_created");
    Ok(name.to_path_buf())
}

fn search(root: &Path, name: &Path) -> Option<PathBuf> {
    WalkDir::new(root)
        .max_depth(SEARCH_MAX_DEPTH)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!(error = %err, "data_file_search_skipped");
                None
            }
        })
        .find(|entry| entry.file_type().is_file() && entry.path().ends_with(name))
        .map(|entry| entry.into_path())
}

fn create_empty(path: &Path) -> Result<(), FlywheelError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| FlywheelError::io("creating data directory", parent, e))?;
    }
    // `create` without `truncate` leaves a file that appeared meanwhile intact.
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|e| {
            warn!(file = %path.display(), error = %e, "data_file_create_failed");
            FlywheelError::io("creating data file", path, e)
        })?;
    Ok(())
}
