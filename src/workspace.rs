//! Temporary workspace management for generation jobs.
//!
//! Each job owns one scratch directory under the configured temp root, named
//! after the job id so concurrent histories never share files. The workspace
//! holds the staged source copy, the combined prompt, and the generator's
//! redirected output.
//!
//! Teardown is best-effort and runs on every exit path: `release` removes the
//! directory tree and logs a warning on failure rather than escalating it to
//! a job failure. `Drop` is the backstop for early returns.

use crate::error::{ForgeError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A job-scoped scratch directory.
#[derive(Debug)]
pub struct Workspace {
    dir: PathBuf,
    released: bool,
}

impl Workspace {
    /// Create the scratch directory for a job, including missing parents.
    pub fn stage(temp_root: &Path, job_id: &str) -> Result<Self> {
        let dir = temp_root.join(job_id);
        fs::create_dir_all(&dir).map_err(|e| {
            ForgeError::Workspace(format!(
                "failed to create scratch directory '{}': {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self {
            dir,
            released: false,
        })
    }

    /// Path of the scratch directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a scratch file would have, without creating it.
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Stage a scratch file and return its path.
    pub fn write(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.file_path(name);
        fs::write(&path, content).map_err(|e| {
            ForgeError::Workspace(format!(
                "failed to write scratch file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(path)
    }

    /// Remove the scratch directory and everything in it.
    ///
    /// Removal failure yields a warning message for the caller to report; it
    /// is never a job failure.
    pub fn release(mut self) -> Option<String> {
        self.released = true;
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => None,
            Err(e) => Some(format!(
                "failed to clean up scratch directory '{}': {}",
                self.dir.display(),
                e
            )),
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = fs::remove_dir_all(&self.dir) {
            eprintln!(
                "Warning: failed to clean up scratch directory '{}': {}",
                self.dir.display(),
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn stage_creates_job_scoped_directory() {
        let temp = TempDir::new().unwrap();
        let ws = Workspace::stage(temp.path(), "features-20260807143022").unwrap();

        assert!(ws.dir().is_dir());
        assert!(ws.dir().ends_with("features-20260807143022"));
    }

    #[test]
    fn write_stages_files_inside_the_workspace() {
        let temp = TempDir::new().unwrap();
        let ws = Workspace::stage(temp.path(), "job").unwrap();

        let path = ws.write("combined_prompt.txt", "prompt body").unwrap();

        assert!(path.starts_with(ws.dir()));
        assert_eq!(fs::read_to_string(&path).unwrap(), "prompt body");
    }

    #[test]
    fn release_removes_every_scratch_file() {
        let temp = TempDir::new().unwrap();
        let ws = Workspace::stage(temp.path(), "job").unwrap();
        ws.write("source.txt", "a").unwrap();
        ws.write("combined_prompt.txt", "b").unwrap();
        let dir = ws.dir().to_path_buf();

        assert!(ws.release().is_none());
        assert!(!dir.exists());
    }

    #[test]
    fn drop_cleans_up_on_early_exit_paths() {
        let temp = TempDir::new().unwrap();
        let dir;
        {
            let ws = Workspace::stage(temp.path(), "job").unwrap();
            ws.write("source.txt", "a").unwrap();
            dir = ws.dir().to_path_buf();
            // ws dropped without an explicit release, as on a failure return
        }
        assert!(!dir.exists());
    }

    #[test]
    fn two_jobs_never_share_a_directory() {
        let temp = TempDir::new().unwrap();
        let a = Workspace::stage(temp.path(), "plan-20260807143022").unwrap();
        let b = Workspace::stage(temp.path(), "plan-20260807143023").unwrap();
        assert_ne!(a.dir(), b.dir());
    }
}
