//! Tests for config loading, defaults, and validation.

use super::*;

#[test]
fn empty_yaml_yields_defaults() {
    let config = Config::from_yaml("{}").unwrap();

    assert_eq!(config.temp_dir, ".testforge/tmp");
    assert_eq!(config.output_root, "generated");
    assert_eq!(config.generator.command, "gemini --model {model}");
    assert_eq!(config.generator.timeout_seconds, 60);
    assert!(config.extraction.command.is_none());
    assert!(config.preflight.tools.is_empty());
}

#[test]
fn default_profiles_chain_stage_outputs() {
    let config = Config::default();

    assert_eq!(config.plan.source_dir, "documents");
    assert_eq!(config.scenarios.source_dir, "generated/test-plans");
    assert_eq!(config.scenarios.source_glob, "test-plan-*.json");
    assert_eq!(config.features.source_dir, "generated/test-scenarios");
    assert_eq!(config.stepdefs.source_dir, "reviewed-features");
}

#[test]
fn default_features_profile_is_multi_artifact() {
    let config = Config::default();

    assert_eq!(config.features.output_kind, OutputKind::MultiArtifact);
    assert_eq!(config.features.fence_tag.as_deref(), Some("gherkin"));
    assert_eq!(config.features.header_prefix.as_deref(), Some("Feature:"));
    assert_eq!(config.features.extension, "feature");
}

#[test]
fn default_stepdefs_profile_processes_all_sources() {
    let config = Config::default();

    assert_eq!(config.stepdefs.selection, SourceSelection::All);
    assert_eq!(config.stepdefs.output_kind, OutputKind::SingleDocument);
    assert_eq!(config.stepdefs.extension, "steps.js");
}

#[test]
fn profile_lookup_matches_kind() {
    let config = Config::default();
    assert_eq!(
        config.profile(ArtifactKind::Plan).file_prefix,
        config.plan.file_prefix
    );
    assert_eq!(
        config.profile(ArtifactKind::Stepdefs).source_dir,
        config.stepdefs.source_dir
    );
}

#[test]
fn yaml_overrides_are_applied() {
    let yaml = r#"
generator:
  command: "claude -p {prompt_file} --model {model}"
  default_model: claude-sonnet
  timeout_seconds: 120
plan:
  source_glob: "*prd*.md"
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.generator.command, "claude -p {prompt_file} --model {model}");
    assert_eq!(config.generator.default_model, "claude-sonnet");
    assert_eq!(config.generator.timeout_seconds, 120);
    assert_eq!(config.plan.source_glob, "*prd*.md");
    // untouched sections keep their defaults
    assert_eq!(config.features.extension, "feature");
}

#[test]
fn unknown_keys_are_ignored() {
    let yaml = "future_setting: true\ngenerator:\n  command: gen\n";
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.generator.command, "gen");
}

#[test]
fn malformed_yaml_is_a_config_error() {
    let err = Config::from_yaml("generator: [not, a, mapping").unwrap_err();
    assert!(err.to_string().contains("failed to parse config YAML"));
}

#[test]
fn zero_timeout_fails_validation() {
    let yaml = "generator:\n  timeout_seconds: 0\n";
    let err = Config::from_yaml(yaml).unwrap_err();
    assert!(err.to_string().contains("timeout_seconds"));
}

#[test]
fn empty_generator_command_fails_validation() {
    let yaml = "generator:\n  command: \"\"\n";
    let err = Config::from_yaml(yaml).unwrap_err();
    assert!(err.to_string().contains("generator.command"));
}

#[test]
fn multi_artifact_profile_requires_fence_and_header() {
    let yaml = "features:\n  fence_tag: \"\"\n";
    let err = Config::from_yaml(yaml).unwrap_err();
    assert!(err.to_string().contains("fence_tag"));
}

#[test]
fn partial_profile_override_keeps_kind_defaults() {
    let yaml = "features:\n  extension: gherkin\n";
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.features.extension, "gherkin");
    // untouched fields keep the features-specific defaults
    assert_eq!(config.features.output_kind, OutputKind::MultiArtifact);
    assert_eq!(config.features.prompt, "prompts/feature-files.md");
    assert_eq!(config.features.header_prefix.as_deref(), Some("Feature:"));
}

#[test]
fn dotted_extension_fails_validation() {
    let yaml = "stepdefs:\n  extension: \".js\"\n";
    let err = Config::from_yaml(yaml).unwrap_err();
    assert!(err.to_string().contains("must not start with a dot"));
}

#[test]
fn default_config_round_trips_through_yaml() {
    let config = Config::default();
    let yaml = config.to_yaml().unwrap();
    let reparsed = Config::from_yaml(&yaml).unwrap();

    assert_eq!(reparsed.generator.command, config.generator.command);
    assert_eq!(reparsed.plan.label, config.plan.label);
    assert_eq!(reparsed.features.header_prefix, config.features.header_prefix);
}

#[test]
fn tool_checks_parse_with_optional_install() {
    let yaml = r#"
preflight:
  tools:
    - name: pandoc
      version_command: "pandoc --version"
      install_command: "apt-get install -y pandoc"
    - name: node
      version_command: "node --version"
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.preflight.tools.len(), 2);
    assert!(config.preflight.tools[0].install_command.is_some());
    assert!(config.preflight.tools[1].install_command.is_none());
}
