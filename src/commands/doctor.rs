//! Implementation of the `testforge doctor` command.
//!
//! Read-only project health report: verifies the generator CLI and auxiliary
//! tools are reachable, and that each profile's prompt template and source
//! directory exist. Nothing is generated and nothing is installed; each
//! issue carries a suggested fix instead.

use crate::cli::DoctorArgs;
use crate::config::Config;
use crate::context::ProjectContext;
use crate::error::{ForgeError, Result};
use crate::preflight;

/// Severity level for issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IssueSeverity {
    /// Potential problem; generation may still work.
    Warning,
    /// Generation will fail until this is fixed.
    Error,
}

impl std::fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueSeverity::Warning => write!(f, "WARNING"),
            IssueSeverity::Error => write!(f, "ERROR"),
        }
    }
}

/// A detected issue with a recommended fix.
#[derive(Debug, Clone)]
struct Issue {
    severity: IssueSeverity,
    description: String,
    remediation: String,
}

pub fn cmd_doctor(args: &DoctorArgs) -> Result<()> {
    let ctx = ProjectContext::resolve(args.config.as_deref())?;
    let config = Config::load(&ctx.config_path)?;

    let mut issues = Vec::new();
    check_generator(&config, &mut issues)?;
    check_tools(&config, &mut issues);
    check_profiles(&ctx, &config, &mut issues);

    if issues.is_empty() {
        println!("No problems found.");
        return Ok(());
    }

    for issue in &issues {
        println!("{}: {}", issue.severity, issue.description);
        println!("  Fix: {}", issue.remediation);
    }

    let errors = issues
        .iter()
        .filter(|i| i.severity == IssueSeverity::Error)
        .count();
    if errors > 0 {
        return Err(ForgeError::Usage(format!(
            "doctor found {errors} error(s); fix them before generating"
        )));
    }

    println!("\n{} warning(s); generation may still work.", issues.len());
    Ok(())
}

fn check_generator(config: &Config, issues: &mut Vec<Issue>) -> Result<()> {
    let program = preflight::generator_program(config)?;
    if !preflight::probe_command(&format!("{program} --version")) {
        issues.push(Issue {
            severity: IssueSeverity::Error,
            description: format!("generator CLI '{program}' is not available"),
            remediation: format!(
                "install '{program}' and ensure it is on PATH, or change generator.command"
            ),
        });
    }
    Ok(())
}

fn check_tools(config: &Config, issues: &mut Vec<Issue>) {
    for tool in &config.preflight.tools {
        if !preflight::probe_command(&tool.version_command) {
            let remediation = match &tool.install_command {
                Some(install) => format!("run `{install}` or let preflight install it"),
                None => "install it manually".to_string(),
            };
            issues.push(Issue {
                severity: IssueSeverity::Warning,
                description: format!("auxiliary tool '{}' is not available", tool.name),
                remediation,
            });
        }
    }
}

fn check_profiles(ctx: &ProjectContext, config: &Config, issues: &mut Vec<Issue>) {
    for (kind, profile) in config.profiles() {
        let prompt = ctx.path(&profile.prompt);
        if !prompt.is_file() {
            issues.push(Issue {
                severity: IssueSeverity::Warning,
                description: format!(
                    "prompt template for '{kind}' is missing: {}",
                    prompt.display()
                ),
                remediation: "run `testforge init` or create the template".to_string(),
            });
        }

        let source_dir = ctx.path(&profile.source_dir);
        if !source_dir.is_dir() {
            issues.push(Issue {
                severity: IssueSeverity::Warning,
                description: format!(
                    "source directory for '{kind}' is missing: {}",
                    source_dir.display()
                ),
                remediation: format!(
                    "create it, or run the earlier pipeline stage that produces '{}'",
                    profile.source_glob
                ),
            });
        }
    }
}
