//! Dependency preflight.
//!
//! Before a job does any work, the external generator CLI and every
//! configured auxiliary tool are probed with their version commands. The
//! generator's absence is non-recoverable within the job; an auxiliary tool
//! with an `install_command` gets one installation attempt and a re-probe.
//! Installation mutates the local environment and is the only preflight side
//! effect.

use crate::config::{Config, ToolCheck};
use crate::error::{ForgeError, Result};
use crate::prompt::{render_template, vars};
use std::process::{Command, Stdio};

/// Outcome of one dependency check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub ok: bool,
    pub detail: String,
}

/// Outcome of the whole preflight pass.
#[derive(Debug, Clone, Default)]
pub struct PreflightReport {
    pub checks: Vec<CheckResult>,
    /// Auxiliary tools that were installed during this pass.
    pub installed: Vec<String>,
}

/// Verify the generator CLI and all auxiliary tools are available.
pub fn verify(config: &Config) -> Result<PreflightReport> {
    let mut report = PreflightReport::default();

    let program = generator_program(config)?;
    let version_command = format!("{program} --version");
    if probe_command(&version_command) {
        report.checks.push(CheckResult {
            name: program.clone(),
            ok: true,
            detail: "generator CLI is available".to_string(),
        });
    } else {
        return Err(ForgeError::MissingDependency(format!(
            "generator CLI '{}' not found\n\
             Fix: install it and ensure it is on PATH, or change generator.command \
             in testforge.yaml.",
            program
        )));
    }

    for tool in &config.preflight.tools {
        verify_tool(tool, &mut report)?;
    }

    Ok(report)
}

/// The program name of the configured generator command.
pub fn generator_program(config: &Config) -> Result<String> {
    // Placeholders are irrelevant to the program name; render with dummies.
    let variables = vars([("model", "preflight"), ("prompt_file", "preflight")]);
    let rendered = render_template(&config.generator.command, &variables)
        .map_err(|e| ForgeError::Config(format!("invalid generator command: {e}")))?;

    let args = shell_words::split(&rendered).map_err(|e| {
        ForgeError::Config(format!(
            "failed to parse generator command '{}': {}",
            rendered, e
        ))
    })?;

    args.into_iter()
        .next()
        .ok_or_else(|| ForgeError::Config("generator command is empty".to_string()))
}

fn verify_tool(tool: &ToolCheck, report: &mut PreflightReport) -> Result<()> {
    if probe_command(&tool.version_command) {
        report.checks.push(CheckResult {
            name: tool.name.clone(),
            ok: true,
            detail: "available".to_string(),
        });
        return Ok(());
    }

    let Some(install) = &tool.install_command else {
        return Err(missing_tool(tool));
    };

    eprintln!("Installing missing dependency '{}'...", tool.name);
    run_install(install)?;
    report.installed.push(tool.name.clone());

    if !probe_command(&tool.version_command) {
        return Err(missing_tool(tool));
    }

    report.checks.push(CheckResult {
        name: tool.name.clone(),
        ok: true,
        detail: "installed during preflight".to_string(),
    });
    Ok(())
}

fn missing_tool(tool: &ToolCheck) -> ForgeError {
    ForgeError::MissingDependency(format!(
        "required tool '{}' is not available (probe: `{}`)\n\
         Fix: install it manually or configure preflight.tools[].install_command.",
        tool.name, tool.version_command
    ))
}

/// Run a probe command silently; true when it exits 0.
pub fn probe_command(command_str: &str) -> bool {
    let Ok(args) = shell_words::split(command_str) else {
        return false;
    };
    let Some((program, rest)) = args.split_first() else {
        return false;
    };
    Command::new(program)
        .args(rest)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Run an install command with inherited output so the user sees progress.
fn run_install(command_str: &str) -> Result<()> {
    let args = shell_words::split(command_str).map_err(|e| {
        ForgeError::Config(format!(
            "failed to parse install command '{}': {}",
            command_str, e
        ))
    })?;
    let Some((program, rest)) = args.split_first() else {
        return Err(ForgeError::Config("install command is empty".to_string()));
    };

    let status = Command::new(program).args(rest).status().map_err(|e| {
        ForgeError::MissingDependency(format!("failed to run install command '{program}': {e}"))
    })?;

    if !status.success() {
        return Err(ForgeError::MissingDependency(format!(
            "install command '{}' failed with status {}",
            command_str, status
        )));
    }
    Ok(())
}
