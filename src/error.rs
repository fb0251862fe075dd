//! Error types for the testforge CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.
//! Every variant is fatal for the job that raised it: the pipeline aborts,
//! scratch teardown still runs, and the process exits with code 1.

use thiserror::Error;

/// Main error type for testforge operations.
///
/// The variants mirror the failure taxonomy of the generation pipeline:
/// configuration and dependency problems surface before any side effect,
/// generation failures surface after the external CLI ran, and parse/write
/// failures surface before any partial artifact state is left behind.
#[derive(Error, Debug)]
pub enum ForgeError {
    /// Configuration file is missing, malformed, or fails validation.
    #[error("{0}")]
    Config(String),

    /// An external tool or auxiliary dependency is absent.
    #[error("missing dependency: {0}")]
    MissingDependency(String),

    /// A source document or prompt template could not be located or read.
    #[error("{0}")]
    InputNotFound(String),

    /// The external generator did not finish within the configured timeout.
    #[error("generation timed out after {0} seconds")]
    GenerationTimeout(u64),

    /// The external generator could not be started or exited abnormally.
    #[error("generation process failed: {0}")]
    GenerationProcess(String),

    /// The generator exited successfully but produced no usable text.
    #[error("generator produced empty output")]
    EmptyGenerationOutput,

    /// Parsing an otherwise successful generation yielded zero artifacts.
    #[error("{0}")]
    ParseYieldedNothing(String),

    /// An output artifact could not be written to its destination.
    #[error("{0}")]
    Write(String),

    /// A scratch file or workspace directory could not be staged.
    #[error("{0}")]
    Workspace(String),

    /// Invalid command-line usage or project state.
    #[error("{0}")]
    Usage(String),
}

/// Result type alias for testforge operations.
pub type Result<T> = std::result::Result<T, ForgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = ForgeError::MissingDependency("gemini CLI not found".to_string());
        assert_eq!(err.to_string(), "missing dependency: gemini CLI not found");

        let err = ForgeError::GenerationTimeout(60);
        assert_eq!(err.to_string(), "generation timed out after 60 seconds");

        let err = ForgeError::EmptyGenerationOutput;
        assert_eq!(err.to_string(), "generator produced empty output");
    }

    #[test]
    fn wrapped_messages_pass_through() {
        let err = ForgeError::Config("failed to parse config YAML: bad indent".to_string());
        assert_eq!(err.to_string(), "failed to parse config YAML: bad indent");

        let err = ForgeError::ParseYieldedNothing("no valid feature blocks".to_string());
        assert_eq!(err.to_string(), "no valid feature blocks");
    }
}
