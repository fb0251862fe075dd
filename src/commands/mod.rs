//! Command implementations for testforge.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. The four generator commands differ only in the artifact
//! kind they pass to the shared runner in `generate`.

mod doctor;
mod generate;
mod init;

use crate::cli::Command;
use crate::config::ArtifactKind;
use crate::error::Result;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Init => init::cmd_init(),
        Command::Plan(args) => generate::cmd_generate(ArtifactKind::Plan, &args),
        Command::Scenarios(args) => generate::cmd_generate(ArtifactKind::Scenarios, &args),
        Command::Features(args) => generate::cmd_generate(ArtifactKind::Features, &args),
        Command::Stepdefs(args) => generate::cmd_generate(ArtifactKind::Stepdefs, &args),
        Command::Doctor(args) => doctor::cmd_doctor(&args),
    }
}
