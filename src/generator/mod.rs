//! External text-generation seam.
//!
//! The pipeline talks to the generator through a narrow trait so tests can
//! inject a canned double instead of shelling out. The only production
//! implementation runs the configured CLI as a subprocess with scratch-file
//! plumbing and a hard timeout.

mod executor;

pub use executor::CliGenerator;

use crate::error::Result;
use crate::workspace::Workspace;
use std::time::Duration;

/// A text-generation service.
pub trait Generator {
    /// Generate text for a composed prompt.
    ///
    /// Scratch files the implementation needs are staged inside the job
    /// workspace so teardown removes them with everything else. The returned
    /// text is guaranteed non-empty after trimming.
    fn generate(
        &self,
        workspace: &Workspace,
        prompt: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<String>;
}
