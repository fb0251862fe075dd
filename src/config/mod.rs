//! Configuration for the testforge pipeline.
//!
//! The config file (`testforge.yaml`) maps named paths and document metadata
//! to the four built-in artifact profiles, plus the external generator,
//! extraction, and preflight settings. Loading is fail-fast: a malformed or
//! invalid file aborts before any side effect occurs, and the loaded value is
//! passed explicitly into the pipeline rather than held as process-wide
//! state.

mod model;
mod operations;
mod types;

#[cfg(test)]
mod tests;

pub use model::{
    Config, ExtractionConfig, GeneratorConfig, PreflightConfig, Profile, ToolCheck,
};
pub use types::{ArtifactKind, OutputFormat, OutputKind, SourceSelection};
