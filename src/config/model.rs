//! Config struct definition and built-in profile defaults.

use super::types::*;
use crate::document::DocumentMetadata;
use serde::{Deserialize, Serialize};

/// Configuration for the testforge pipeline.
///
/// This struct represents the contents of `testforge.yaml`, with every
/// profile fully resolved against its kind-specific defaults. Unknown fields
/// are ignored for forward compatibility; every field has a default so an
/// empty file is a valid configuration. Parsing goes through [`RawConfig`]
/// so a partial profile section overrides only the fields it names.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Scratch directory root, relative to the project root.
    pub temp_dir: String,

    /// Output directory root, relative to the project root.
    pub output_root: String,

    /// External generator settings.
    pub generator: GeneratorConfig,

    /// Optional external extractor for non-plaintext source documents.
    pub extraction: ExtractionConfig,

    /// Auxiliary tools verified before a job starts.
    pub preflight: PreflightConfig,

    /// Profile for `testforge plan`.
    pub plan: Profile,

    /// Profile for `testforge scenarios`.
    pub scenarios: Profile,

    /// Profile for `testforge features`.
    pub features: Profile,

    /// Profile for `testforge stepdefs`.
    pub stepdefs: Profile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            temp_dir: default_temp_dir(),
            output_root: default_output_root(),
            generator: GeneratorConfig::default(),
            extraction: ExtractionConfig::default(),
            preflight: PreflightConfig::default(),
            plan: Profile::default_plan(),
            scenarios: Profile::default_scenarios(),
            features: Profile::default_features(),
            stepdefs: Profile::default_stepdefs(),
        }
    }
}

impl Config {
    /// Profile for an artifact kind.
    pub fn profile(&self, kind: ArtifactKind) -> &Profile {
        match kind {
            ArtifactKind::Plan => &self.plan,
            ArtifactKind::Scenarios => &self.scenarios,
            ArtifactKind::Features => &self.features,
            ArtifactKind::Stepdefs => &self.stepdefs,
        }
    }

    /// Profiles paired with their kinds, in pipeline order.
    pub fn profiles(&self) -> [(ArtifactKind, &Profile); 4] {
        [
            (ArtifactKind::Plan, &self.plan),
            (ArtifactKind::Scenarios, &self.scenarios),
            (ArtifactKind::Features, &self.features),
            (ArtifactKind::Stepdefs, &self.stepdefs),
        ]
    }
}

/// External generator invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Command template; supports `{model}` and `{prompt_file}` placeholders.
    /// When `{prompt_file}` is absent the prompt is piped to stdin.
    pub command: String,

    /// Model identifier used when a profile does not override it.
    pub default_model: String,

    /// Maximum generation time before the process is killed.
    pub timeout_seconds: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            command: default_generator_command(),
            default_model: default_model(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// External text-extraction settings for word-processor source formats.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Command template with an `{input}` placeholder; stdout is the
    /// extracted text. Unset means only plaintext sources are accepted.
    pub command: Option<String>,
}

/// Preflight verification settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PreflightConfig {
    /// Auxiliary tools checked before each job.
    pub tools: Vec<ToolCheck>,
}

/// One auxiliary tool check.
///
/// The tool is probed with its version command; on failure the install
/// command (when configured) runs once and the probe is retried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCheck {
    /// Display name used in diagnostics.
    pub name: String,

    /// Command that exits 0 when the tool is available.
    pub version_command: String,

    /// Optional one-shot install command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_command: Option<String>,
}

/// Per-artifact-kind parameters for the shared pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    /// Prompt template path, relative to the project root.
    pub prompt: String,

    /// Directory searched for source documents, relative to the project root.
    pub source_dir: String,

    /// Glob that source file names must match.
    pub source_glob: String,

    /// How matching sources are selected.
    pub selection: SourceSelection,

    /// Section label introducing the source text in the composed prompt.
    pub label: String,

    /// Whether the generation result is one document or many fenced blocks.
    pub output_kind: OutputKind,

    /// Whether artifacts are written verbatim or as structured documents.
    pub output_format: OutputFormat,

    /// Output directory name under the output root. For single-document
    /// profiles this is a stable directory; for multi-artifact and
    /// per-source profiles it is the prefix of a timestamped run directory.
    pub output_dir: String,

    /// File-name prefix for timestamped single-document artifacts.
    pub file_prefix: String,

    /// Artifact file extension, without the leading dot.
    pub extension: String,

    /// Fence tag opening an artifact block (multi-artifact profiles).
    pub fence_tag: Option<String>,

    /// Required prefix of a block's first meaningful line (multi-artifact).
    pub header_prefix: Option<String>,

    /// Model override for this profile.
    pub model: Option<String>,

    /// Document properties for structured output.
    pub metadata: DocumentMetadata,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            source_dir: "documents".to_string(),
            source_glob: "*.md".to_string(),
            selection: SourceSelection::Latest,
            label: String::new(),
            output_kind: OutputKind::SingleDocument,
            output_format: OutputFormat::Plain,
            output_dir: String::new(),
            file_prefix: String::new(),
            extension: "md".to_string(),
            fence_tag: None,
            header_prefix: None,
            model: None,
            metadata: DocumentMetadata::default(),
        }
    }
}

impl Profile {
    pub(crate) fn default_plan() -> Self {
        Self {
            prompt: "prompts/test-plan.md".to_string(),
            source_dir: "documents".to_string(),
            source_glob: "*.md".to_string(),
            label: "PRD CONTENT TO ANALYZE".to_string(),
            output_format: OutputFormat::Structured,
            output_dir: "test-plans".to_string(),
            file_prefix: "test-plan".to_string(),
            extension: "json".to_string(),
            metadata: DocumentMetadata {
                title: "Test Plan".to_string(),
                subject: "Generated test plan".to_string(),
                keywords: "testing, test plan".to_string(),
                description: "Test plan generated from the requirements document".to_string(),
            },
            ..Default::default()
        }
    }

    pub(crate) fn default_scenarios() -> Self {
        Self {
            prompt: "prompts/test-scenarios.md".to_string(),
            source_dir: "generated/test-plans".to_string(),
            source_glob: "test-plan-*.json".to_string(),
            label: "TEST PLAN CONTENT TO ANALYZE".to_string(),
            output_format: OutputFormat::Structured,
            output_dir: "test-scenarios".to_string(),
            file_prefix: "test-scenarios".to_string(),
            extension: "json".to_string(),
            metadata: DocumentMetadata {
                title: "Test Scenarios".to_string(),
                subject: "Generated test scenarios".to_string(),
                keywords: "testing, test scenarios".to_string(),
                description: "Detailed test scenarios generated from the test plan".to_string(),
            },
            ..Default::default()
        }
    }

    pub(crate) fn default_features() -> Self {
        Self {
            prompt: "prompts/feature-files.md".to_string(),
            source_dir: "generated/test-scenarios".to_string(),
            source_glob: "test-scenarios-*.json".to_string(),
            label: "FUNCTIONAL TEST SCENARIOS TO ANALYZE".to_string(),
            output_kind: OutputKind::MultiArtifact,
            output_dir: "feature-files".to_string(),
            file_prefix: "feature-files".to_string(),
            extension: "feature".to_string(),
            fence_tag: Some("gherkin".to_string()),
            header_prefix: Some("Feature:".to_string()),
            ..Default::default()
        }
    }

    pub(crate) fn default_stepdefs() -> Self {
        Self {
            prompt: "prompts/step-definitions.md".to_string(),
            source_dir: "reviewed-features".to_string(),
            source_glob: "*.feature".to_string(),
            selection: SourceSelection::All,
            label: "FEATURE FILE CONTENT".to_string(),
            output_dir: "step-definitions".to_string(),
            file_prefix: "step-definitions".to_string(),
            extension: "steps.js".to_string(),
            ..Default::default()
        }
    }
}

/// On-disk shape of `testforge.yaml`.
///
/// Profile sections are partial: a field left out keeps the kind-specific
/// default rather than falling back to a generic one.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawConfig {
    pub temp_dir: Option<String>,
    pub output_root: Option<String>,
    pub generator: Option<GeneratorConfig>,
    pub extraction: Option<ExtractionConfig>,
    pub preflight: Option<PreflightConfig>,
    pub plan: ProfileOverride,
    pub scenarios: ProfileOverride,
    pub features: ProfileOverride,
    pub stepdefs: ProfileOverride,
}

impl RawConfig {
    pub(super) fn resolve(self) -> Config {
        let defaults = Config::default();
        Config {
            temp_dir: self.temp_dir.unwrap_or(defaults.temp_dir),
            output_root: self.output_root.unwrap_or(defaults.output_root),
            generator: self.generator.unwrap_or(defaults.generator),
            extraction: self.extraction.unwrap_or(defaults.extraction),
            preflight: self.preflight.unwrap_or(defaults.preflight),
            plan: self.plan.apply(defaults.plan),
            scenarios: self.scenarios.apply(defaults.scenarios),
            features: self.features.apply(defaults.features),
            stepdefs: self.stepdefs.apply(defaults.stepdefs),
        }
    }
}

/// Partial profile section; `null` fields keep the default.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct ProfileOverride {
    prompt: Option<String>,
    source_dir: Option<String>,
    source_glob: Option<String>,
    selection: Option<SourceSelection>,
    label: Option<String>,
    output_kind: Option<OutputKind>,
    output_format: Option<OutputFormat>,
    output_dir: Option<String>,
    file_prefix: Option<String>,
    extension: Option<String>,
    fence_tag: Option<String>,
    header_prefix: Option<String>,
    model: Option<String>,
    metadata: Option<DocumentMetadata>,
}

impl ProfileOverride {
    fn apply(self, mut base: Profile) -> Profile {
        if let Some(v) = self.prompt {
            base.prompt = v;
        }
        if let Some(v) = self.source_dir {
            base.source_dir = v;
        }
        if let Some(v) = self.source_glob {
            base.source_glob = v;
        }
        if let Some(v) = self.selection {
            base.selection = v;
        }
        if let Some(v) = self.label {
            base.label = v;
        }
        if let Some(v) = self.output_kind {
            base.output_kind = v;
        }
        if let Some(v) = self.output_format {
            base.output_format = v;
        }
        if let Some(v) = self.output_dir {
            base.output_dir = v;
        }
        if let Some(v) = self.file_prefix {
            base.file_prefix = v;
        }
        if let Some(v) = self.extension {
            base.extension = v;
        }
        if let Some(v) = self.fence_tag {
            base.fence_tag = Some(v);
        }
        if let Some(v) = self.header_prefix {
            base.header_prefix = Some(v);
        }
        if let Some(v) = self.model {
            base.model = Some(v);
        }
        if let Some(v) = self.metadata {
            base.metadata = v;
        }
        base
    }
}
