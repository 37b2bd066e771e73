//! Tracing subscriber setup.
//!
//! Console logging goes to stderr so it never interleaves with the drill
//! prompt on stdout. A configured log file is rotated on startup once it
//! reaches `max_file_bytes`, keeping at most `max_files` files
//! (`fw.log`, `fw.log.1`, ...).

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{ConfigLoadError, LoggingConfig};
use crate::error::FlywheelError;

/// Install the global subscriber described by `cfg`.
///
/// Does nothing if a subscriber is already installed.
pub fn init_logging(cfg: &LoggingConfig) -> Result<(), FlywheelError> {
    let filter = EnvFilter::try_new(&cfg.level).map_err(|e| {
        ConfigLoadError::Validation(format!("invalid logging.level {:?}: {e}", cfg.level))
    })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match &cfg.file {
        Some(path) => {
            rotate_log_file(path, cfg.max_file_bytes, cfg.max_files)
                .map_err(|e| FlywheelError::io("rotating log file", path, e))?;
            let file = open_log_file(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(io::stderr).try_init(),
    };

    if installed.is_ok() {
        tracing::debug!(level = %cfg.level, file = ?cfg.file, "logging_initialized");
    }
    Ok(())
}

fn open_log_file(path: &Path) -> Result<fs::File, FlywheelError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| FlywheelError::io("creating log directory", parent, e))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| FlywheelError::io("opening log file", path, e))
}

/// Rotate `path` if it has reached `max_bytes`.
///
/// Returns whether a rotation happened. The oldest backup beyond
/// `max_files` is deleted.
pub fn rotate_log_file(path: &Path, max_bytes: u64, max_files: usize) -> io::Result<bool> {
    let len = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };
    if len < max_bytes {
        return Ok(false);
    }

    let backups = max_files.saturating_sub(1);
    if backups == 0 {
        fs::remove_file(path)?;
        return Ok(true);
    }

    let oldest = backup_path(path, backups);
    if oldest.exists() {
        fs::remove_file(&oldest)?;
    }
    for n in (1..backups).rev() {
        let from = backup_path(path, n);
        if from.exists() {
            fs::rename(&from, backup_path(path, n + 1))?;
        }
    }
    fs::rename(path, backup_path(path, 1))?;
    Ok(true)
}

fn backup_path(path: &Path, n: usize) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(format!(".{n}"));
    PathBuf::from(name)
}
