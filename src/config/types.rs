//! Configuration enums, constants, and default value functions.

use serde::{Deserialize, Serialize};

/// The artifact kinds the pipeline can produce, one per generator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Test plan generated from a requirements document.
    Plan,
    /// Test scenarios generated from the latest test plan.
    Scenarios,
    /// BDD feature files generated from the latest scenario document.
    Features,
    /// Step definitions generated from reviewed feature files.
    Stepdefs,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Plan => "plan",
            ArtifactKind::Scenarios => "scenarios",
            ArtifactKind::Features => "features",
            ArtifactKind::Stepdefs => "stepdefs",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of a job's generated output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// The whole generation result is one artifact body.
    #[default]
    SingleDocument,
    /// The result is scanned for delimited blocks, one artifact per block.
    MultiArtifact,
}

/// On-disk format of written artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Artifact bodies written verbatim.
    #[default]
    Plain,
    /// Markdown bodies converted to the structured document model (JSON).
    Structured,
}

/// How source documents are selected from the source directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceSelection {
    /// The most recently modified match; one job per invocation.
    #[default]
    Latest,
    /// Every match (or the named one); one job per source file.
    All,
}

// Default value functions for serde

pub(crate) fn default_temp_dir() -> String {
    ".testforge/tmp".to_string()
}

pub(crate) fn default_output_root() -> String {
    "generated".to_string()
}

pub(crate) fn default_generator_command() -> String {
    "gemini --model {model}".to_string()
}

pub(crate) fn default_model() -> String {
    "gemini-2.5-pro".to_string()
}

pub(crate) fn default_timeout_seconds() -> u64 {
    60
}
