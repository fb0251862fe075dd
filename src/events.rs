//! Append-only run event log.
//!
//! Every pipeline stage transition is recorded as one NDJSON line in
//! `.testforge/events.ndjson`, giving an audit trail of what each run
//! generated and why a run failed. The log is ambient observability, not
//! load-bearing state: an append failure is reported as a warning and never
//! aborts a job.
//!
//! Each event carries an RFC3339 timestamp, the action, a `user@host` actor
//! string, an optional job id, and action-specific details.

use crate::context::ProjectContext;
use crate::error::{ForgeError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;

/// Actions recorded in the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// A generation job started.
    JobStart,
    /// Dependency preflight completed.
    Preflight,
    /// The external generator returned output.
    Generated,
    /// The raw output was parsed into artifacts.
    Parsed,
    /// Artifacts were written to the output location.
    Written,
    /// The job failed; details carry the error.
    JobFailed,
    /// Scratch teardown could not remove everything.
    CleanupWarning,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EventAction::JobStart => "job_start",
            EventAction::Preflight => "preflight",
            EventAction::Generated => "generated",
            EventAction::Parsed => "parsed",
            EventAction::Written => "written",
            EventAction::JobFailed => "job_failed",
            EventAction::CleanupWarning => "cleanup_warning",
        };
        f.write_str(s)
    }
}

/// One event record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The action that was performed.
    pub action: EventAction,

    /// The actor who performed the action (`user@host`).
    pub actor: String,

    /// Job id for job-scoped events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,

    /// Action-specific details.
    pub details: Value,
}

impl Event {
    /// New event for the given action, stamped with the current time.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: actor_string(),
            job: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Attach a job id.
    pub fn with_job(mut self, job_id: impl Into<String>) -> Self {
        self.job = Some(job_id.into());
        self
    }

    /// Attach a details object.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize to a single NDJSON line.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| ForgeError::Write(format!("failed to serialize event: {}", e)))
    }
}

fn actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());
    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    format!("{}@{}", user, host)
}

/// Append an event to the project's event log.
pub fn append_event(ctx: &ProjectContext, event: &Event) -> Result<()> {
    let path = ctx.events_path();
    let line = event.to_ndjson_line()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            ForgeError::Write(format!(
                "failed to create events directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| {
            ForgeError::Write(format!(
                "failed to open events file '{}': {}",
                path.display(),
                e
            ))
        })?;

    writeln!(file, "{}", line).map_err(|e| {
        ForgeError::Write(format!(
            "failed to append event to '{}': {}",
            path.display(),
            e
        ))
    })?;

    Ok(())
}

/// Append an event, downgrading any failure to a stderr warning.
///
/// The event log must never turn a succeeding job into a failing one.
pub fn record(ctx: &ProjectContext, event: Event) {
    if let Err(e) = append_event(ctx, &event) {
        eprintln!("Warning: {}", e);
    }
}
