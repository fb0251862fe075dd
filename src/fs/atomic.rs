//! Atomic file write operations.
//!
//! Artifacts and project state are written with a temp-file-plus-rename
//! pattern so a crash mid-write never leaves a half-written file at the
//! destination path:
//!
//! 1. Write content to `.{filename}.tmp` in the same directory
//! 2. Sync the file to disk (fsync)
//! 3. Rename over the target path
//!
//! Rename is atomic on POSIX when source and destination share a filesystem;
//! on Windows an existing destination is removed first.

use crate::error::{ForgeError, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically write bytes to a file, creating parent directories as needed.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            ForgeError::Write(format!(
                "failed to create parent directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path_for(path)?;
    write_and_sync(&temp_path, content)?;
    replace_file(&temp_path, path)?;

    Ok(())
}

/// Atomically write a string to a file.
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Temporary file path in the same directory as the target.
fn temp_path_for(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ForgeError::Write(format!("invalid file path '{}'", target.display())))?;
    Ok(parent.join(format!(".{}.tmp", filename)))
}

fn write_and_sync(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| {
        ForgeError::Write(format!(
            "failed to create temporary file '{}': {}",
            path.display(),
            e
        ))
    })?;

    file.write_all(content).map_err(|e| {
        let _ = fs::remove_file(path);
        ForgeError::Write(format!(
            "failed to write temporary file '{}': {}",
            path.display(),
            e
        ))
    })?;

    file.sync_all().map_err(|e| {
        let _ = fs::remove_file(path);
        ForgeError::Write(format!(
            "failed to sync temporary file '{}': {}",
            path.display(),
            e
        ))
    })?;

    Ok(())
}

fn replace_file(from: &Path, to: &Path) -> Result<()> {
    // Windows rename fails when the destination exists.
    #[cfg(windows)]
    if to.exists() {
        fs::remove_file(to).map_err(|e| {
            ForgeError::Write(format!(
                "failed to remove existing file '{}': {}",
                to.display(),
                e
            ))
        })?;
    }

    fs::rename(from, to).map_err(|e| {
        let _ = fs::remove_file(from);
        ForgeError::Write(format!(
            "failed to replace '{}' with temporary file: {}",
            to.display(),
            e
        ))
    })
}
