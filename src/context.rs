//! Project context resolution for testforge.
//!
//! Commands can be invoked from anywhere inside a project: the context layer
//! walks up from the working directory until it finds `testforge.yaml` and
//! roots every configured relative path at that directory. An explicit
//! `--config` path overrides discovery.

use crate::error::{ForgeError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = "testforge.yaml";

/// Directory holding machine-local pipeline state (event log, scratch space).
pub const STATE_DIR_NAME: &str = ".testforge";

/// Resolved paths for a testforge project.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    /// Absolute path to the project root (the config file's directory).
    pub root: PathBuf,

    /// Absolute path to the configuration file.
    pub config_path: PathBuf,
}

impl ProjectContext {
    /// Resolve the project context from the current working directory.
    pub fn resolve(config_override: Option<&Path>) -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            ForgeError::Usage(format!("failed to get current working directory: {}", e))
        })?;
        Self::resolve_from(&cwd, config_override)
    }

    /// Resolve the project context from a specific directory.
    pub fn resolve_from(cwd: &Path, config_override: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_override {
            if !path.is_file() {
                return Err(ForgeError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            let config_path = absolutize(cwd, path);
            let root = config_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| cwd.to_path_buf());
            return Ok(Self { root, config_path });
        }

        let mut dir = cwd;
        loop {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Ok(Self {
                    root: dir.to_path_buf(),
                    config_path: candidate,
                });
            }
            match dir.parent() {
                Some(parent) => dir = parent,
                None => {
                    return Err(ForgeError::Config(format!(
                        "no {} found in '{}' or any parent directory\n\
                         Fix: run `testforge init` in your project root.",
                        CONFIG_FILE_NAME,
                        cwd.display()
                    )));
                }
            }
        }
    }

    /// Resolve a config-relative path against the project root.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Directory holding machine-local state.
    pub fn state_dir(&self) -> PathBuf {
        self.root.join(STATE_DIR_NAME)
    }

    /// Path of the append-only run event log.
    pub fn events_path(&self) -> PathBuf {
        self.state_dir().join("events.ndjson")
    }
}

fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
