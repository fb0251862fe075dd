//! Implementation of the `testforge init` command.
//!
//! Scaffolds a project: the default configuration, the prompts/ directory
//! with starter instruction templates, the expected input directories, and
//! the machine-local state directory with its git ignore rules.

use crate::config::Config;
use crate::context::{CONFIG_FILE_NAME, STATE_DIR_NAME};
use crate::error::{ForgeError, Result};
use crate::fs::atomic_write_file;
use std::env;
use std::fs;
use std::path::Path;

const PROMPT_FILES: &[(&str, &str)] = &[
    ("prompts/test-plan.md", TEST_PLAN_PROMPT),
    ("prompts/test-scenarios.md", TEST_SCENARIOS_PROMPT),
    ("prompts/feature-files.md", FEATURE_FILES_PROMPT),
    ("prompts/step-definitions.md", STEP_DEFINITIONS_PROMPT),
];

const INPUT_DIRS: &[&str] = &["documents", "reviewed-features"];

pub fn cmd_init() -> Result<()> {
    let cwd = env::current_dir()
        .map_err(|e| ForgeError::Usage(format!("failed to get current working directory: {e}")))?;
    init_in(&cwd)
}

/// Scaffold a project in the given directory.
pub fn init_in(root: &Path) -> Result<()> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        return Err(ForgeError::Usage(format!(
            "project already initialized: {} exists",
            config_path.display()
        )));
    }

    let yaml = Config::default().to_yaml()?;
    atomic_write_file(&config_path, &yaml)?;
    println!("Created {}", config_path.display());

    for (relative, content) in PROMPT_FILES {
        let path = root.join(relative);
        if !path.exists() {
            atomic_write_file(&path, content)?;
            println!("Created {}", path.display());
        }
    }

    for relative in INPUT_DIRS {
        let path = root.join(relative);
        fs::create_dir_all(&path).map_err(|e| {
            ForgeError::Write(format!(
                "failed to create directory '{}': {}",
                path.display(),
                e
            ))
        })?;
    }

    // Machine-local state is never committed.
    let state_dir = root.join(STATE_DIR_NAME);
    fs::create_dir_all(&state_dir).map_err(|e| {
        ForgeError::Write(format!(
            "failed to create state directory '{}': {}",
            state_dir.display(),
            e
        ))
    })?;
    atomic_write_file(state_dir.join(".gitignore"), "tmp/\nevents.ndjson\n")?;

    println!(
        "\nProject initialized. Put your requirements document in documents/ \
         and run `testforge plan`."
    );
    Ok(())
}

const TEST_PLAN_PROMPT: &str = "\
# Test Plan Generator

You are a senior QA engineer. Analyze the product requirements below and
produce a complete test plan in markdown.

Structure the plan with these sections:

# Test Plan
## Objectives
## Scope
## Test Approach
## Test Environment
## Entry and Exit Criteria
## Risks and Mitigations

Use `## ` headings, bullet lists for enumerations, and **bold** for key terms.
Return only the markdown document, with no commentary before or after it.
";

const TEST_SCENARIOS_PROMPT: &str = "\
# Test Scenario Generator

You are a senior QA engineer. Expand the test plan below into detailed
functional test scenarios in markdown.

For each area of the plan, write scenarios as numbered lists:

1. A short scenario title, followed by preconditions, steps, and expected
   results as bullets.

Cover positive paths, negative paths, and edge cases. Use `## ` headings per
functional area and **bold** for scenario identifiers. Return only the
markdown document.
";

const FEATURE_FILES_PROMPT: &str = "\
# Feature File Generator

You are a BDD test automation engineer. Convert the functional test scenarios
below into Gherkin feature files.

Rules:

- Wrap every feature in its own fenced block tagged `gherkin`.
- The first line inside each block must start with `Feature:`.
- Use Scenario, Given/When/Then, and examples tables where data varies.
- Steps must describe user-visible behavior, not implementation details.

Produce one block per functional area. Return only the fenced blocks.
";

const STEP_DEFINITIONS_PROMPT: &str = "\
# Step Definition Generator

You are a test automation engineer. Write Cucumber step definitions in
JavaScript for the feature file below.

Rules:

- Implement every Given/When/Then step the feature uses.
- Drive the browser through the provided browser automation tool: navigate,
  click, and fill by natural-language instruction, and take a screenshot
  using the provided tool when an assertion fails.
- Export nothing; register steps with @cucumber/cucumber.

Return only the JavaScript source, with no markdown fences.
";
