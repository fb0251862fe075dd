//! The document-to-artifact generation pipeline.
//!
//! One engine, parameterized per artifact kind: read the prompt template and
//! source document, compose the prompt, stage a scratch workspace, invoke the
//! external generator, parse the raw output into artifacts, and write them to
//! a timestamp-qualified output location.
//!
//! Per job the flow is strictly sequential:
//!
//! ```text
//! Idle -> Preflighted -> Composed -> Staged -> Invoked -> Parsed -> Written -> CleanedUp
//! ```
//!
//! with `Failed` reachable from any non-terminal state. Scratch teardown runs
//! on every exit path; artifacts are written only after the full raw result
//! is parsed, so a failed job leaves no partial output state behind.

use crate::artifact::{self, Artifact, IndexInfo, OutputTarget, WrittenManifest};
use crate::config::{ArtifactKind, Config, OutputFormat, OutputKind};
use crate::context::ProjectContext;
use crate::document::DocumentMetadata;
use crate::error::{ForgeError, Result};
use crate::events::{Event, EventAction, record};
use crate::generator::Generator;
use crate::prompt;
use crate::source;
use crate::workspace::Workspace;
use chrono::{DateTime, Local};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Everything one generation job needs, resolved up front and immutable for
/// the job's duration.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    /// Job identifier, also the scratch directory name
    /// (e.g. `features-20260807143022`).
    pub id: String,

    /// The artifact kind being generated.
    pub kind: ArtifactKind,

    /// Source document feeding the prompt.
    pub source_path: PathBuf,

    /// Instruction template path.
    pub prompt_path: PathBuf,

    /// Section label introducing the source text in the composed prompt.
    pub label: String,

    /// One document or many fenced blocks.
    pub output_kind: OutputKind,

    /// Verbatim or structured persistence.
    pub output_format: OutputFormat,

    /// Resolved output location.
    pub target: OutputTarget,

    /// Artifact file extension for parsed blocks.
    pub extension: String,

    /// Fence tag opening an artifact block (multi-artifact only).
    pub fence_tag: Option<String>,

    /// Required header prefix of a valid block (multi-artifact only).
    pub header_prefix: Option<String>,

    /// Model identifier passed to the generator.
    pub model: String,

    /// Generation timeout.
    pub timeout: Duration,

    /// Document properties for structured output.
    pub metadata: DocumentMetadata,

    /// Wall-clock instant the run was started, used for naming and the index.
    pub generated_at: DateTime<Local>,
}

/// The parameterized pipeline engine.
pub struct Pipeline<'a> {
    ctx: &'a ProjectContext,
    config: &'a Config,
    generator: &'a dyn Generator,
}

impl<'a> Pipeline<'a> {
    pub fn new(ctx: &'a ProjectContext, config: &'a Config, generator: &'a dyn Generator) -> Self {
        Self {
            ctx,
            config,
            generator,
        }
    }

    /// Run one job end to end.
    ///
    /// On success the returned manifest lists every written artifact; on
    /// failure the error is also recorded in the event log. Scratch files
    /// are cleaned up either way.
    pub fn run(&self, job: &GenerationJob) -> Result<WrittenManifest> {
        record(
            self.ctx,
            Event::new(EventAction::JobStart)
                .with_job(&job.id)
                .with_details(json!({
                    "kind": job.kind.as_str(),
                    "source": display_name(&job.source_path),
                    "model": job.model,
                })),
        );

        let outcome = self.run_inner(job);

        match &outcome {
            Ok(manifest) => record(
                self.ctx,
                Event::new(EventAction::Written)
                    .with_job(&job.id)
                    .with_details(json!({
                        "artifacts": manifest.artifacts.len(),
                        "output_dir": manifest.output_dir.display().to_string(),
                    })),
            ),
            Err(err) => record(
                self.ctx,
                Event::new(EventAction::JobFailed)
                    .with_job(&job.id)
                    .with_details(json!({"error": err.to_string()})),
            ),
        }

        outcome
    }

    fn run_inner(&self, job: &GenerationJob) -> Result<WrittenManifest> {
        let template = read_prompt_template(&job.prompt_path)?;
        let source_text = source::extract_text(&job.source_path, &self.config.extraction)?;
        let prompt_text = prompt::compose(&template, &job.label, &source_text);

        let temp_root = self.ctx.path(&self.config.temp_dir);
        let workspace = Workspace::stage(&temp_root, &job.id)?;
        let result = self.generate_and_write(&workspace, job, &prompt_text, &source_text);
        if let Some(warning) = workspace.release() {
            eprintln!("Warning: {warning}");
            record(
                self.ctx,
                Event::new(EventAction::CleanupWarning)
                    .with_job(&job.id)
                    .with_details(json!({"warning": warning})),
            );
        }
        result
    }

    fn generate_and_write(
        &self,
        workspace: &Workspace,
        job: &GenerationJob,
        prompt_text: &str,
        source_text: &str,
    ) -> Result<WrittenManifest> {
        workspace.write("source_content.txt", source_text)?;

        let raw = self
            .generator
            .generate(workspace, prompt_text, &job.model, job.timeout)?;
        if raw.trim().is_empty() {
            return Err(ForgeError::EmptyGenerationOutput);
        }
        record(
            self.ctx,
            Event::new(EventAction::Generated)
                .with_job(&job.id)
                .with_details(json!({"chars": raw.len()})),
        );

        let artifacts = self.parse(job, &raw)?;
        record(
            self.ctx,
            Event::new(EventAction::Parsed)
                .with_job(&job.id)
                .with_details(json!({"artifacts": artifacts.len()})),
        );

        let index = match job.output_kind {
            OutputKind::MultiArtifact => Some(IndexInfo {
                source_name: display_name(&job.source_path),
                prompt_name: display_name(&job.prompt_path),
                generated_at: job.generated_at,
            }),
            OutputKind::SingleDocument => None,
        };

        artifact::write_all(
            &artifacts,
            &job.target,
            job.output_format,
            &job.metadata,
            index.as_ref(),
        )
    }

    fn parse(&self, job: &GenerationJob, raw: &str) -> Result<Vec<Artifact>> {
        match job.output_kind {
            OutputKind::SingleDocument => {
                let body = artifact::parse_single(raw)?;
                let file_name = match &job.target {
                    OutputTarget::SingleFile { file_name, .. } => file_name.clone(),
                    OutputTarget::RunDirectory { .. } => {
                        return Err(ForgeError::Write(
                            "single-document job has no destination file name".to_string(),
                        ));
                    }
                };
                let title = if job.metadata.title.is_empty() {
                    job.kind.to_string()
                } else {
                    job.metadata.title.clone()
                };
                Ok(vec![Artifact {
                    file_name,
                    title,
                    body,
                }])
            }
            OutputKind::MultiArtifact => {
                let fence_tag = job.fence_tag.as_deref().ok_or_else(|| {
                    ForgeError::Config(format!("{}.fence_tag is not configured", job.kind))
                })?;
                let header_prefix = job.header_prefix.as_deref().ok_or_else(|| {
                    ForgeError::Config(format!("{}.header_prefix is not configured", job.kind))
                })?;

                let outcome =
                    artifact::parse_blocks(raw, fence_tag, header_prefix, &job.extension)?;
                if outcome.skipped > 0 {
                    eprintln!(
                        "Warning: skipped {} malformed block(s) in generated output",
                        outcome.skipped
                    );
                }
                Ok(outcome.artifacts)
            }
        }
    }
}

fn read_prompt_template(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(ForgeError::InputNotFound(format!(
            "prompt template not found: {}",
            path.display()
        )));
    }
    fs::read_to_string(path).map_err(|e| {
        ForgeError::InputNotFound(format!(
            "failed to read prompt template '{}': {}",
            path.display(),
            e
        ))
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
