//! Artifact persistence.
//!
//! Artifacts are written only after the full generation result has been
//! parsed, so a failed job never leaves partial output behind. Every write is
//! atomic (temp file + rename). Plain targets are written verbatim;
//! structured targets are converted to the typed document model and
//! persisted as JSON. Multi-artifact runs also get a `README.md` index
//! enumerating what was produced.

use super::Artifact;
use crate::config::OutputFormat;
use crate::document::{DocumentMetadata, StructuredDocument};
use crate::error::{ForgeError, Result};
use crate::fs::atomic_write_file;
use chrono::{DateTime, Local};
use std::fs;
use std::path::PathBuf;

/// Where a job's artifacts land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// One timestamp-named file inside a stable per-kind directory.
    SingleFile { dir: PathBuf, file_name: String },

    /// A timestamped run directory holding every artifact by name.
    RunDirectory { dir: PathBuf },
}

impl OutputTarget {
    /// The directory artifacts are written into.
    pub fn dir(&self) -> &PathBuf {
        match self {
            OutputTarget::SingleFile { dir, .. } => dir,
            OutputTarget::RunDirectory { dir } => dir,
        }
    }
}

/// Provenance recorded in a multi-artifact run's index file.
#[derive(Debug, Clone)]
pub struct IndexInfo {
    pub source_name: String,
    pub prompt_name: String,
    pub generated_at: DateTime<Local>,
}

/// One successfully written artifact.
#[derive(Debug, Clone)]
pub struct WrittenArtifact {
    pub file_name: String,
    pub path: PathBuf,
    pub bytes: u64,
}

/// Everything one job wrote.
#[derive(Debug, Clone)]
pub struct WrittenManifest {
    pub output_dir: PathBuf,
    pub artifacts: Vec<WrittenArtifact>,
}

/// Write all artifacts of a job to its output target.
pub fn write_all(
    artifacts: &[Artifact],
    target: &OutputTarget,
    format: OutputFormat,
    metadata: &DocumentMetadata,
    index: Option<&IndexInfo>,
) -> Result<WrittenManifest> {
    let dir = target.dir();
    fs::create_dir_all(dir).map_err(|e| {
        ForgeError::Write(format!(
            "failed to create output directory '{}': {}",
            dir.display(),
            e
        ))
    })?;

    let mut written = Vec::new();
    match target {
        OutputTarget::SingleFile { dir, file_name } => {
            let artifact = artifacts.first().ok_or_else(|| {
                ForgeError::Write("no artifact available to write".to_string())
            })?;
            written.push(write_one(artifact, dir.join(file_name), format, metadata)?);
        }
        OutputTarget::RunDirectory { dir } => {
            for artifact in artifacts {
                let path = dir.join(&artifact.file_name);
                written.push(write_one(artifact, path, format, metadata)?);
            }
            if let Some(info) = index {
                let index_body = render_index(artifacts, info);
                let index_path = dir.join("README.md");
                atomic_write_file(&index_path, &index_body)?;
            }
        }
    }

    Ok(WrittenManifest {
        output_dir: dir.clone(),
        artifacts: written,
    })
}

fn write_one(
    artifact: &Artifact,
    path: PathBuf,
    format: OutputFormat,
    metadata: &DocumentMetadata,
) -> Result<WrittenArtifact> {
    let content = match format {
        OutputFormat::Plain => artifact.body.clone(),
        OutputFormat::Structured => {
            let mut metadata = metadata.clone();
            if metadata.title.is_empty() {
                metadata.title = artifact.title.clone();
            }
            StructuredDocument::from_markdown(metadata, &artifact.body).to_json()?
        }
    };

    atomic_write_file(&path, &content)?;

    Ok(WrittenArtifact {
        file_name: artifact.file_name.clone(),
        bytes: content.len() as u64,
        path,
    })
}

/// Human-readable index for a multi-artifact run.
fn render_index(artifacts: &[Artifact], info: &IndexInfo) -> String {
    let listing: Vec<String> = artifacts
        .iter()
        .map(|a| format!("- **{}** - {}", a.file_name, a.title))
        .collect();

    format!(
        "# Generated Artifacts\n\n\
         Generated on: {}\n\
         Source: {}\n\
         Prompt: {}\n\n\
         ## Files in this directory\n\n\
         {}\n",
        info.generated_at.to_rfc3339(),
        info.source_name,
        info.prompt_name,
        listing.join("\n")
    )
}
