//! The shared generator command runner.
//!
//! All four generator commands are one workflow differing only by profile:
//! which prompt template, which source documents, what output shape, and
//! where artifacts land. This module resolves those parameters into
//! [`GenerationJob`]s and runs them through the pipeline, sequentially, one
//! process per invocation.

use crate::artifact::OutputTarget;
use crate::cli::GenerateArgs;
use crate::config::{ArtifactKind, Config, OutputKind, Profile, SourceSelection};
use crate::context::ProjectContext;
use crate::error::Result;
use crate::events::{Event, EventAction, record};
use crate::generator::CliGenerator;
use crate::naming;
use crate::pipeline::{GenerationJob, Pipeline};
use crate::preflight;
use crate::source;
use chrono::{DateTime, Local};
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;

/// Run one generator command end to end.
pub fn cmd_generate(kind: ArtifactKind, args: &GenerateArgs) -> Result<()> {
    let ctx = ProjectContext::resolve(args.config.as_deref())?;
    let config = Config::load(&ctx.config_path)?;

    println!("Checking dependencies...");
    let report = preflight::verify(&config)?;
    for name in &report.installed {
        println!("Installed missing dependency '{name}'.");
    }
    record(
        &ctx,
        Event::new(EventAction::Preflight).with_details(json!({
            "checks": report.checks.len(),
            "installed": report.installed,
        })),
    );

    let now = Local::now();
    let jobs = build_jobs(&ctx, &config, kind, args, now)?;

    let generator = CliGenerator::new(&config.generator);
    let pipeline = Pipeline::new(&ctx, &config, &generator);

    let mut total = 0usize;
    let mut last_output_dir: Option<PathBuf> = None;
    for job in &jobs {
        let source_name = job
            .source_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        println!("Generating {kind} from '{source_name}' (this may take a moment)...");

        let manifest = pipeline.run(job)?;
        for artifact in &manifest.artifacts {
            println!("  wrote {} ({} bytes)", artifact.path.display(), artifact.bytes);
        }
        total += manifest.artifacts.len();
        last_output_dir = Some(manifest.output_dir);
    }

    if let Some(dir) = last_output_dir {
        println!("Done: {total} artifact(s) in '{}'.", dir.display());
    }
    Ok(())
}

/// Resolve the jobs a command invocation will run.
///
/// Latest-selection profiles yield one job for the newest matching source
/// (or the named one); all-selection profiles yield one job per matching
/// source, all writing into a single timestamped run directory.
fn build_jobs(
    ctx: &ProjectContext,
    config: &Config,
    kind: ArtifactKind,
    args: &GenerateArgs,
    now: DateTime<Local>,
) -> Result<Vec<GenerationJob>> {
    let profile = config.profile(kind);
    let source_dir = ctx.path(&profile.source_dir);

    let sources = match profile.selection {
        SourceSelection::Latest => match &args.input {
            Some(name) => source::find_matching(&source_dir, &profile.source_glob, Some(name))?,
            None => vec![source::find_latest(&source_dir, &profile.source_glob)?],
        },
        SourceSelection::All => {
            source::find_matching(&source_dir, &profile.source_glob, args.input.as_deref())?
        }
    };

    let ts = naming::timestamp(&now);
    let model = args
        .model
        .clone()
        .or_else(|| profile.model.clone())
        .unwrap_or_else(|| config.generator.default_model.clone());
    let timeout = Duration::from_secs(args.timeout.unwrap_or(config.generator.timeout_seconds));
    let output_root = ctx.path(&config.output_root);
    let run_dir = output_root.join(naming::timestamped_dir_name(&profile.output_dir, &ts));

    let jobs = sources
        .into_iter()
        .map(|source_path| {
            let (id, target) =
                job_identity(profile, kind, &source_path, &ts, &output_root, &run_dir);
            GenerationJob {
                id,
                kind,
                source_path,
                prompt_path: ctx.path(&profile.prompt),
                label: profile.label.clone(),
                output_kind: profile.output_kind,
                output_format: profile.output_format,
                target,
                extension: profile.extension.clone(),
                fence_tag: profile.fence_tag.clone(),
                header_prefix: profile.header_prefix.clone(),
                model: model.clone(),
                timeout,
                metadata: profile.metadata.clone(),
                generated_at: now,
            }
        })
        .collect();

    Ok(jobs)
}

fn job_identity(
    profile: &Profile,
    kind: ArtifactKind,
    source_path: &std::path::Path,
    ts: &str,
    output_root: &std::path::Path,
    run_dir: &std::path::Path,
) -> (String, OutputTarget) {
    match (profile.output_kind, profile.selection) {
        (OutputKind::MultiArtifact, _) => (
            format!("{kind}-{ts}"),
            OutputTarget::RunDirectory {
                dir: run_dir.to_path_buf(),
            },
        ),
        (OutputKind::SingleDocument, SourceSelection::All) => {
            let stem = source_path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "source".to_string());
            (
                format!("{kind}-{ts}-{stem}"),
                OutputTarget::SingleFile {
                    dir: run_dir.to_path_buf(),
                    file_name: naming::source_file_name(source_path, &profile.extension),
                },
            )
        }
        (OutputKind::SingleDocument, SourceSelection::Latest) => (
            format!("{kind}-{ts}"),
            OutputTarget::SingleFile {
                dir: output_root.join(&profile.output_dir),
                file_name: naming::timestamped_file_name(
                    &profile.file_prefix,
                    ts,
                    &profile.extension,
                ),
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CONFIG_FILE_NAME;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, ProjectContext, Config) {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "{}").unwrap();
        let ctx = ProjectContext::resolve_from(temp.path(), None).unwrap();
        (temp, ctx, Config::default())
    }

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 8, 7, 14, 30, 22).unwrap()
    }

    #[test]
    fn plan_job_targets_a_timestamped_file() {
        let (temp, ctx, config) = fixture();
        fs::create_dir_all(temp.path().join("documents")).unwrap();
        fs::write(temp.path().join("documents/prd.md"), "requirements").unwrap();

        let jobs = build_jobs(
            &ctx,
            &config,
            ArtifactKind::Plan,
            &GenerateArgs::default(),
            fixed_now(),
        )
        .unwrap();

        assert_eq!(jobs.len(), 1);
        let job = &jobs[0];
        assert_eq!(job.id, "plan-20260807143022");
        match &job.target {
            OutputTarget::SingleFile { dir, file_name } => {
                assert!(dir.ends_with("generated/test-plans"));
                assert_eq!(file_name, "test-plan-20260807143022.json");
            }
            other => panic!("unexpected target {other:?}"),
        }
    }

    #[test]
    fn features_job_targets_a_timestamped_run_directory() {
        let (temp, ctx, config) = fixture();
        fs::create_dir_all(temp.path().join("generated/test-scenarios")).unwrap();
        fs::write(
            temp.path().join("generated/test-scenarios/test-scenarios-1.json"),
            "{}",
        )
        .unwrap();

        let jobs = build_jobs(
            &ctx,
            &config,
            ArtifactKind::Features,
            &GenerateArgs::default(),
            fixed_now(),
        )
        .unwrap();

        assert_eq!(jobs.len(), 1);
        match &jobs[0].target {
            OutputTarget::RunDirectory { dir } => {
                assert!(dir.ends_with("generated/feature-files-20260807143022"));
            }
            other => panic!("unexpected target {other:?}"),
        }
        assert_eq!(jobs[0].fence_tag.as_deref(), Some("gherkin"));
    }

    #[test]
    fn stepdefs_build_one_job_per_feature_in_a_shared_run_directory() {
        let (temp, ctx, config) = fixture();
        fs::create_dir_all(temp.path().join("reviewed-features")).unwrap();
        fs::write(temp.path().join("reviewed-features/login.feature"), "f").unwrap();
        fs::write(temp.path().join("reviewed-features/cart.feature"), "f").unwrap();

        let jobs = build_jobs(
            &ctx,
            &config,
            ArtifactKind::Stepdefs,
            &GenerateArgs::default(),
            fixed_now(),
        )
        .unwrap();

        assert_eq!(jobs.len(), 2);
        // sorted by name: cart before login
        match &jobs[0].target {
            OutputTarget::SingleFile { dir, file_name } => {
                assert!(dir.ends_with("generated/step-definitions-20260807143022"));
                assert_eq!(file_name, "cart.steps.js");
            }
            other => panic!("unexpected target {other:?}"),
        }
        match &jobs[1].target {
            OutputTarget::SingleFile { dir, file_name } => {
                assert!(dir.ends_with("generated/step-definitions-20260807143022"));
                assert_eq!(file_name, "login.steps.js");
            }
            other => panic!("unexpected target {other:?}"),
        }
        // scratch directories stay distinct per source
        assert_ne!(jobs[0].id, jobs[1].id);
    }

    #[test]
    fn positional_input_restricts_stepdefs_to_one_file() {
        let (temp, ctx, config) = fixture();
        fs::create_dir_all(temp.path().join("reviewed-features")).unwrap();
        fs::write(temp.path().join("reviewed-features/login.feature"), "f").unwrap();
        fs::write(temp.path().join("reviewed-features/cart.feature"), "f").unwrap();

        let args = GenerateArgs {
            input: Some("login.feature".to_string()),
            ..Default::default()
        };
        let jobs = build_jobs(&ctx, &config, ArtifactKind::Stepdefs, &args, fixed_now()).unwrap();

        assert_eq!(jobs.len(), 1);
        assert!(jobs[0].source_path.ends_with("login.feature"));
    }

    #[test]
    fn overrides_take_precedence_over_config() {
        let (temp, ctx, config) = fixture();
        fs::create_dir_all(temp.path().join("documents")).unwrap();
        fs::write(temp.path().join("documents/prd.md"), "requirements").unwrap();

        let args = GenerateArgs {
            model: Some("gemini-2.5-flash".to_string()),
            timeout: Some(120),
            ..Default::default()
        };
        let jobs = build_jobs(&ctx, &config, ArtifactKind::Plan, &args, fixed_now()).unwrap();

        assert_eq!(jobs[0].model, "gemini-2.5-flash");
        assert_eq!(jobs[0].timeout, Duration::from_secs(120));
    }

    #[test]
    fn missing_sources_fail_before_any_side_effect() {
        let (_temp, ctx, config) = fixture();

        let err = build_jobs(
            &ctx,
            &config,
            ArtifactKind::Plan,
            &GenerateArgs::default(),
            fixed_now(),
        )
        .unwrap_err();

        assert!(err.to_string().contains("source directory not found"));
    }
}
