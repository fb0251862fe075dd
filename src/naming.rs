//! Timestamp-qualified naming for output locations.
//!
//! Repeated runs never collide: single-document jobs embed a timestamp in the
//! file name inside a stable per-kind directory, while multi-artifact runs
//! get a fresh timestamped directory. Two runs within the same second could
//! still collide; a collision-resistant token would replace the timestamp if
//! concurrent runs ever became a requirement.

use chrono::{DateTime, Local};
use std::path::Path;

/// Compact local timestamp used in output names, e.g. `20260807143022`.
pub fn timestamp(now: &DateTime<Local>) -> String {
    now.format("%Y%m%d%H%M%S").to_string()
}

/// File name for a timestamped single-document artifact,
/// e.g. `test-plan-20260807143022.json`.
pub fn timestamped_file_name(prefix: &str, ts: &str, extension: &str) -> String {
    format!("{prefix}-{ts}.{extension}")
}

/// Directory name for a timestamped multi-artifact run,
/// e.g. `feature-files-20260807143022`.
pub fn timestamped_dir_name(prefix: &str, ts: &str) -> String {
    format!("{prefix}-{ts}")
}

/// Output file name derived from a source file's stem,
/// e.g. `login.feature` -> `login.steps.js`.
pub fn source_file_name(source: &Path, extension: &str) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    format!("{stem}.{extension}")
}
