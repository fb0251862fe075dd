//! Generator subprocess executor.
//!
//! Runs the external generation CLI with scratch-file plumbing: the composed
//! prompt is staged as a scratch file and fed to the child on stdin (or via a
//! `{prompt_file}` placeholder when the command template names one), stdout
//! is redirected to a scratch output file, stderr to a log. The child is
//! polled until exit or until the timeout expires, at which point it is
//! killed.
//!
//! Failure classification keeps three distinct cases apart: the process never
//! finished (`GenerationTimeout`), the process finished badly
//! (`GenerationProcess`), and the process finished fine but said nothing
//! useful (`EmptyGenerationOutput`) — a generator can exit zero and still
//! produce an empty file.

use super::Generator;
use crate::config::GeneratorConfig;
use crate::error::{ForgeError, Result};
use crate::prompt::{TemplateError, render_template, vars};
use crate::workspace::Workspace;
use std::fs::File;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

/// Scratch file holding the composed prompt.
const PROMPT_FILE: &str = "combined_prompt.txt";
/// Scratch file the generator's stdout is redirected to.
const OUTPUT_FILE: &str = "generation_output.md";
/// Scratch file capturing the generator's stderr.
const STDERR_FILE: &str = "generation_stderr.log";

/// Poll interval while waiting for the child process.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// The production generator: a CLI subprocess.
#[derive(Debug, Clone)]
pub struct CliGenerator {
    command_template: String,
}

impl CliGenerator {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            command_template: config.command.clone(),
        }
    }

    fn render_command(&self, model: &str, prompt_file: &str) -> Result<Vec<String>> {
        let variables = vars([("model", model), ("prompt_file", prompt_file)]);
        let command_str =
            render_template(&self.command_template, &variables).map_err(|e| match e {
                TemplateError::UndefinedVariable { name, .. } => ForgeError::Config(format!(
                    "generator command references undefined variable '{{{name}}}'\n\
                     Command: {}\n\
                     Available variables: model, prompt_file",
                    self.command_template
                )),
                other => ForgeError::Config(format!("invalid generator command: {other}")),
            })?;

        let args = shell_words::split(&command_str).map_err(|e| {
            ForgeError::Config(format!(
                "failed to parse generator command '{}': {}\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                command_str, e
            ))
        })?;

        if args.is_empty() {
            return Err(ForgeError::Config(format!(
                "generator command is empty after parsing: '{}'",
                command_str
            )));
        }

        Ok(args)
    }
}

impl Generator for CliGenerator {
    fn generate(
        &self,
        workspace: &Workspace,
        prompt: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<String> {
        let prompt_path = workspace.write(PROMPT_FILE, prompt)?;
        let output_path = workspace.file_path(OUTPUT_FILE);
        let stderr_path = workspace.file_path(STDERR_FILE);

        let args = self.render_command(model, &prompt_path.display().to_string())?;
        let pipes_stdin = !self.command_template.contains("{prompt_file}");

        let stdin = if pipes_stdin {
            let file = File::open(&prompt_path).map_err(|e| {
                ForgeError::Workspace(format!(
                    "failed to open prompt scratch file '{}': {}",
                    prompt_path.display(),
                    e
                ))
            })?;
            Stdio::from(file)
        } else {
            Stdio::null()
        };

        let stdout_file = File::create(&output_path).map_err(|e| {
            ForgeError::Workspace(format!(
                "failed to create output scratch file '{}': {}",
                output_path.display(),
                e
            ))
        })?;
        let stderr_file = File::create(&stderr_path).map_err(|e| {
            ForgeError::Workspace(format!(
                "failed to create stderr scratch file '{}': {}",
                stderr_path.display(),
                e
            ))
        })?;

        let mut child = Command::new(&args[0])
            .args(&args[1..])
            .stdin(stdin)
            .stdout(Stdio::from(stdout_file))
            .stderr(Stdio::from(stderr_file))
            .spawn()
            .map_err(|e| {
                ForgeError::GenerationProcess(format!(
                    "failed to start '{}': {}\n\
                     Fix: ensure the generator CLI is installed and on PATH.",
                    args[0], e
                ))
            })?;

        let (exit_code, timed_out) = wait_with_timeout(&mut child, timeout)?;

        if timed_out {
            return Err(ForgeError::GenerationTimeout(timeout.as_secs()));
        }

        if exit_code != Some(0) {
            let detail = stderr_tail(&stderr_path);
            let code = exit_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            return Err(ForgeError::GenerationProcess(format!(
                "'{}' exited with status {}{}",
                args[0],
                code,
                if detail.is_empty() {
                    String::new()
                } else {
                    format!("\n{detail}")
                }
            )));
        }

        // A successful exit can still mean nothing was produced.
        let raw = std::fs::read_to_string(&output_path)
            .map_err(|_| ForgeError::EmptyGenerationOutput)?;
        if raw.trim().is_empty() {
            return Err(ForgeError::EmptyGenerationOutput);
        }

        Ok(raw)
    }
}

/// Wait for a child process, killing it when the timeout elapses.
///
/// Returns `(exit_code, timed_out)`.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<(Option<i32>, bool)> {
    let start = Instant::now();

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok((status.code(), false)),
            Ok(None) => {
                if start.elapsed() >= timeout {
                    // SIGKILL on Unix; TerminateProcess on Windows.
                    let _ = child.kill();
                    let _ = child.wait();
                    return Ok((None, true));
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                return Err(ForgeError::GenerationProcess(format!(
                    "failed to check generator status: {}",
                    e
                )));
            }
        }
    }
}

/// Last few stderr lines for error messages.
fn stderr_tail(path: &std::path::Path) -> String {
    let Ok(content) = std::fs::read_to_string(path) else {
        return String::new();
    };
    let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(5);
    lines[start..].join("\n")
}
