// LogcatLens - platform/fs.rs
//
// File reading and atomic file writing for log load/save.
// Every failure is reported once as a typed FileError; nothing is retried.

use crate::util::constants;
use crate::util::error::FileError;
use std::io;
use std::path::{Path, PathBuf};

/// Read a log file into lines.
///
/// Invalid UTF-8 is replaced rather than rejected; `\r\n` endings are
/// stripped along with `\n`.
pub fn read_lines(path: &Path) -> Result<Vec<String>, FileError> {
    let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => FileError::NotFound {
            path: path.to_path_buf(),
        },
        _ => FileError::Read {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    if !metadata.is_file() {
        return Err(FileError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    let bytes = std::fs::read(path).map_err(|e| FileError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let lines: Vec<String> = String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::to_string)
        .collect();

    tracing::debug!(
        path = %path.display(),
        bytes = bytes.len(),
        lines = lines.len(),
        "Log file read"
    );
    Ok(lines)
}

/// Sibling path used while a save is in flight.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".");
    name.push(constants::SAVE_TEMP_EXTENSION);
    path.with_file_name(name)
}

/// Write `contents` to `path` atomically (write temp, then rename).
///
/// A failure at any step leaves the previous file at `path` untouched and
/// removes the temporary sibling.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), FileError> {
    let tmp = temp_path(path);

    if let Err(e) = std::fs::write(&tmp, contents.as_bytes()) {
        let _ = std::fs::remove_file(&tmp);
        return Err(FileError::Write {
            path: tmp,
            source: e,
        });
    }

    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        FileError::Write {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    tracing::debug!(path = %path.display(), bytes = contents.len(), "File written");
    Ok(())
}
