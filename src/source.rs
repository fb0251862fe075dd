//! Source document discovery and text extraction.
//!
//! Generators chain: the scenario generator reads the most recent test plan
//! the plan generator wrote, and the step-definition generator walks every
//! reviewed feature file. Discovery is glob-plus-mtime over one directory;
//! extraction turns whatever was found into plain prompt text.
//!
//! Plaintext formats are read directly. Structured documents written by an
//! earlier stage are flattened back to text. Anything else is handed to the
//! configured external extractor command; its stderr chatter is logged as
//! warnings, never treated as fatal.

use crate::config::ExtractionConfig;
use crate::document::StructuredDocument;
use crate::error::{ForgeError, Result};
use crate::prompt::{render_template, vars};
use globset::Glob;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::SystemTime;

/// Extensions read directly as plain text.
const PLAINTEXT_EXTENSIONS: &[&str] = &["txt", "md", "markdown", "feature", "text"];

/// Find the most recently modified file in `dir` matching `glob`.
pub fn find_latest(dir: &Path, glob: &str) -> Result<PathBuf> {
    let mut matches = list_matching(dir, glob)?;

    matches.sort_by_key(|(_, mtime)| *mtime);
    matches
        .pop()
        .map(|(path, _)| path)
        .ok_or_else(|| no_match_error(dir, glob))
}

/// Find every file in `dir` matching `glob`, sorted by name.
///
/// With `specific` set, only the file of exactly that name is returned; a
/// missing or non-matching name is an error.
pub fn find_matching(dir: &Path, glob: &str, specific: Option<&str>) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = list_matching(dir, glob)?
        .into_iter()
        .map(|(path, _)| path)
        .collect();
    paths.sort();

    if let Some(name) = specific {
        let found = paths
            .iter()
            .find(|p| p.file_name().is_some_and(|n| n == name))
            .cloned();
        return match found {
            Some(path) => Ok(vec![path]),
            None => Err(ForgeError::InputNotFound(format!(
                "source file '{}' not found in '{}'",
                name,
                dir.display()
            ))),
        };
    }

    if paths.is_empty() {
        return Err(no_match_error(dir, glob));
    }
    Ok(paths)
}

fn list_matching(dir: &Path, glob: &str) -> Result<Vec<(PathBuf, SystemTime)>> {
    let matcher = Glob::new(glob)
        .map_err(|e| ForgeError::Config(format!("invalid source glob '{}': {}", glob, e)))?
        .compile_matcher();

    if !dir.is_dir() {
        return Err(ForgeError::InputNotFound(format!(
            "source directory not found: {}",
            dir.display()
        )));
    }

    let entries = fs::read_dir(dir).map_err(|e| {
        ForgeError::InputNotFound(format!(
            "failed to read source directory '{}': {}",
            dir.display(),
            e
        ))
    })?;

    let mut matches = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };
        if !matcher.is_match(&name) {
            continue;
        }
        let mtime = entry
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        matches.push((path, mtime));
    }
    Ok(matches)
}

fn no_match_error(dir: &Path, glob: &str) -> ForgeError {
    ForgeError::InputNotFound(format!(
        "no source files matching '{}' in '{}'\n\
         Fix: generate or add the expected input first.",
        glob,
        dir.display()
    ))
}

/// Extract plain text from a source document.
pub fn extract_text(path: &Path, extraction: &ExtractionConfig) -> Result<String> {
    if !path.is_file() {
        return Err(ForgeError::InputNotFound(format!(
            "source document not found: {}",
            path.display()
        )));
    }

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if PLAINTEXT_EXTENSIONS.contains(&ext.as_str()) || ext.is_empty() {
        return read_text(path);
    }

    if ext == "json" {
        let json = read_text(path)?;
        let document = StructuredDocument::from_json(&json).map_err(|_| {
            ForgeError::InputNotFound(format!(
                "'{}' is not a structured document produced by an earlier stage",
                path.display()
            ))
        })?;
        return Ok(document.to_plain_text());
    }

    match &extraction.command {
        Some(command) => run_extractor(command, path),
        None => Err(ForgeError::InputNotFound(format!(
            "unsupported source format '.{}' for '{}'\n\
             Fix: configure extraction.command to convert it to plain text.",
            ext,
            path.display()
        ))),
    }
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        ForgeError::InputNotFound(format!(
            "failed to read source document '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Run the configured extractor command and capture its stdout.
fn run_extractor(command_template: &str, input: &Path) -> Result<String> {
    let variables = vars([("input", input.display().to_string())]);
    let command_str = render_template(command_template, &variables)
        .map_err(|e| ForgeError::Config(format!("invalid extraction command: {}", e)))?;

    let args = shell_words::split(&command_str).map_err(|e| {
        ForgeError::Config(format!(
            "failed to parse extraction command '{}': {}",
            command_str, e
        ))
    })?;
    if args.is_empty() {
        return Err(ForgeError::Config(
            "extraction command is empty".to_string(),
        ));
    }

    let output = Command::new(&args[0]).args(&args[1..]).output().map_err(|e| {
        ForgeError::InputNotFound(format!(
            "failed to run extractor '{}': {}",
            args[0], e
        ))
    })?;

    // Extraction warnings are informational only.
    let stderr = String::from_utf8_lossy(&output.stderr);
    for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
        eprintln!("Warning: extractor: {}", line);
    }

    if !output.status.success() {
        return Err(ForgeError::InputNotFound(format!(
            "extractor '{}' failed with status {} for '{}'",
            args[0],
            output.status,
            input.display()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
