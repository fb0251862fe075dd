//! Config loading, validation, and serialization.

use super::model::Config;
use super::types::OutputKind;
use crate::error::{ForgeError, Result};
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields are silently ignored for forward compatibility. Any
    /// read, parse, or validation failure aborts before any side effect.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            ForgeError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let raw: super::model::RawConfig = serde_yaml::from_str(yaml)
            .map_err(|e| ForgeError::Config(format!("failed to parse config YAML: {}", e)))?;

        let config = raw.resolve();
        config.validate()?;
        Ok(config)
    }

    /// Serialize config to a YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| ForgeError::Config(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values.
    ///
    /// Rules:
    /// - `temp_dir` and `output_root` must be non-empty
    /// - the generator command must be non-empty with a positive timeout
    /// - every profile needs a prompt path, a label, and a source glob
    /// - extensions must be non-empty and carry no leading dot
    /// - multi-artifact profiles must declare a fence tag and header prefix
    pub fn validate(&self) -> Result<()> {
        if self.temp_dir.is_empty() {
            return Err(invalid("temp_dir must be non-empty"));
        }
        if self.output_root.is_empty() {
            return Err(invalid("output_root must be non-empty"));
        }
        if self.generator.command.trim().is_empty() {
            return Err(invalid("generator.command must be non-empty"));
        }
        if self.generator.timeout_seconds == 0 {
            return Err(invalid("generator.timeout_seconds must be greater than 0"));
        }

        for (kind, profile) in self.profiles() {
            if profile.prompt.is_empty() {
                return Err(invalid(&format!("{kind}.prompt must be non-empty")));
            }
            if profile.label.is_empty() {
                return Err(invalid(&format!("{kind}.label must be non-empty")));
            }
            if profile.source_glob.is_empty() {
                return Err(invalid(&format!("{kind}.source_glob must be non-empty")));
            }
            if profile.output_dir.is_empty() {
                return Err(invalid(&format!("{kind}.output_dir must be non-empty")));
            }
            if profile.extension.is_empty() {
                return Err(invalid(&format!("{kind}.extension must be non-empty")));
            }
            if profile.extension.starts_with('.') {
                return Err(invalid(&format!(
                    "{kind}.extension must not start with a dot"
                )));
            }
            if profile.output_kind == OutputKind::MultiArtifact {
                if profile.fence_tag.as_deref().unwrap_or("").is_empty() {
                    return Err(invalid(&format!(
                        "{kind}.fence_tag is required for multi-artifact output"
                    )));
                }
                if profile.header_prefix.as_deref().unwrap_or("").is_empty() {
                    return Err(invalid(&format!(
                        "{kind}.header_prefix is required for multi-artifact output"
                    )));
                }
            }
        }

        Ok(())
    }
}

fn invalid(message: &str) -> ForgeError {
    ForgeError::Config(format!("config validation failed: {message}"))
}
