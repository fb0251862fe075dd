//! Testforge: document-to-artifact generation pipeline.
//!
//! This is the main entry point for the `testforge` CLI. It parses
//! arguments, dispatches to the appropriate command handler, and reports
//! errors with the fixed exit-code contract (0 on success, 1 on any fatal
//! error).

mod cli;
mod commands;
pub mod artifact;
pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod fs;
pub mod generator;
pub mod naming;
pub mod pipeline;
pub mod preflight;
pub mod prompt;
pub mod source;
pub mod workspace;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match commands::dispatch(cli.command) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);
            ExitCode::from(exit_codes::FAILURE as u8)
        }
    }
}
