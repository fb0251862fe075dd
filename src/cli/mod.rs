//! CLI argument parsing for testforge.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Testforge: document-to-artifact generation pipeline.
///
/// Drives an external LLM CLI to turn project documents into test artifacts:
/// a requirements document becomes a test plan, the plan becomes test
/// scenarios, scenarios become BDD feature files, and reviewed feature files
/// become step definitions.
#[derive(Parser, Debug)]
#[command(name = "testforge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Available commands for testforge.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a testforge project in the current directory.
    ///
    /// Creates testforge.yaml with defaults, the prompts/ directory with
    /// placeholder instruction templates, and the expected input directories.
    Init,

    /// Generate a test plan from the requirements document.
    Plan(GenerateArgs),

    /// Generate test scenarios from the most recent test plan.
    Scenarios(GenerateArgs),

    /// Generate BDD feature files from the most recent test scenarios.
    ///
    /// Each valid fenced block in the generator's response becomes one
    /// .feature file; a README.md index is written alongside them.
    Features(GenerateArgs),

    /// Generate step definitions from reviewed feature files.
    ///
    /// Processes every reviewed feature file, or only the one named as the
    /// positional argument.
    Stepdefs(GenerateArgs),

    /// Diagnose project health.
    ///
    /// Verifies the generator CLI, auxiliary tools, prompt templates, and
    /// source directories without generating anything.
    Doctor(DoctorArgs),
}

/// Arguments shared by the four generator commands.
#[derive(Parser, Debug, Default)]
pub struct GenerateArgs {
    /// Restrict processing to this input file name.
    pub input: Option<String>,

    /// Path to the config file (default: nearest testforge.yaml).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Model identifier override for this run.
    #[arg(long)]
    pub model: Option<String>,

    /// Generation timeout in seconds for this run.
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Arguments for the `doctor` command.
#[derive(Parser, Debug, Default)]
pub struct DoctorArgs {
    /// Path to the config file (default: nearest testforge.yaml).
    #[arg(long)]
    pub config: Option<PathBuf>,
}
