//! Typed structured-document model and the one-way markdown conversion.
//!
//! Single-document generation jobs that target the structured format convert
//! the generator's markdown output into this model and persist it as JSON.
//! The same JSON is accepted back as a source document by the next pipeline
//! stage (a generated test plan feeds the scenario generator), flattened to
//! plain text via [`StructuredDocument::to_plain_text`].
//!
//! Conversion is line-oriented with a fixed rule precedence; there is no
//! reverse parser.

use crate::error::{ForgeError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Document properties carried into the structured output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentMetadata {
    pub title: String,
    pub subject: String,
    pub keywords: String,
    pub description: String,
}

/// One formatted run of text within a paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    pub bold: bool,
}

impl Run {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            bold: false,
        }
    }

    fn bold(text: &str) -> Self {
        Self {
            text: text.to_string(),
            bold: true,
        }
    }
}

/// One block of a structured document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Empty paragraph used for vertical spacing.
    Spacer,
    /// Bold heading; level 1 is the largest.
    Heading { level: u8, text: String },
    /// Bullet item with the list prefix stripped. No nesting support.
    Bullet { text: String },
    /// Numbered item kept verbatim, numeral included.
    Numbered { text: String },
    /// Paragraph of alternating plain/bold runs.
    Paragraph { runs: Vec<Run> },
}

/// A structured document: metadata plus an ordered sequence of blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredDocument {
    pub metadata: DocumentMetadata,
    pub blocks: Vec<Block>,
}

/// Render font size for a heading level (levels beyond 3 clamp to 3).
pub fn heading_font_size(level: u8) -> u8 {
    match level {
        1 => 16,
        2 => 14,
        _ => 12,
    }
}

fn numbered_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\. ").expect("valid numbered-line pattern"))
}

impl StructuredDocument {
    /// Convert markdown-like text into a structured document.
    ///
    /// Each line is trimmed and classified by the first matching rule:
    /// blank, `# `, `## `, `### `, `* `/`- `, `<digits>. `, a line containing
    /// a `**` span, then plain paragraph.
    pub fn from_markdown(metadata: DocumentMetadata, markdown: &str) -> Self {
        let blocks = markdown.lines().map(|raw| classify_line(raw.trim())).collect();
        Self { metadata, blocks }
    }

    /// Flatten the document back to plain text for use as source input.
    ///
    /// Formatting is dropped: headings and paragraphs become bare lines,
    /// bullets regain a `- ` prefix, numbered items stay verbatim.
    pub fn to_plain_text(&self) -> String {
        let lines: Vec<String> = self
            .blocks
            .iter()
            .map(|block| match block {
                Block::Spacer => String::new(),
                Block::Heading { text, .. } => text.clone(),
                Block::Bullet { text } => format!("- {text}"),
                Block::Numbered { text } => text.clone(),
                Block::Paragraph { runs } => {
                    runs.iter().map(|r| r.text.as_str()).collect::<String>()
                }
            })
            .collect();
        lines.join("\n")
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ForgeError::Write(format!("failed to serialize document: {}", e)))
    }

    /// Parse a document previously written by [`StructuredDocument::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ForgeError::InputNotFound(format!("not a structured document: {}", e)))
    }
}

fn classify_line(line: &str) -> Block {
    if line.is_empty() {
        Block::Spacer
    } else if let Some(text) = line.strip_prefix("# ") {
        Block::Heading {
            level: 1,
            text: text.to_string(),
        }
    } else if let Some(text) = line.strip_prefix("## ") {
        Block::Heading {
            level: 2,
            text: text.to_string(),
        }
    } else if let Some(text) = line.strip_prefix("### ") {
        Block::Heading {
            level: 3,
            text: text.to_string(),
        }
    } else if let Some(text) = line.strip_prefix("* ").or_else(|| line.strip_prefix("- ")) {
        Block::Bullet {
            text: text.to_string(),
        }
    } else if numbered_line_re().is_match(line) {
        Block::Numbered {
            text: line.to_string(),
        }
    } else if line.contains("**") {
        Block::Paragraph {
            runs: split_bold_runs(line),
        }
    } else {
        Block::Paragraph {
            runs: vec![Run::plain(line)],
        }
    }
}

/// Split a line on `**` delimiters into alternating plain/bold runs.
///
/// Empty segments (leading `**`, doubled delimiters) produce no run.
fn split_bold_runs(line: &str) -> Vec<Run> {
    line.split("**")
        .enumerate()
        .filter(|(_, part)| !part.is_empty())
        .map(|(i, part)| if i % 2 == 0 { Run::plain(part) } else { Run::bold(part) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(markdown: &str) -> Vec<Block> {
        StructuredDocument::from_markdown(DocumentMetadata::default(), markdown).blocks
    }

    #[test]
    fn level_two_heading_drops_marker() {
        let blocks = convert("## Setup");
        assert_eq!(
            blocks,
            vec![Block::Heading {
                level: 2,
                text: "Setup".to_string()
            }]
        );
        assert_eq!(heading_font_size(2), 14);
    }

    #[test]
    fn heading_levels_map_to_sizes() {
        assert_eq!(heading_font_size(1), 16);
        assert_eq!(heading_font_size(2), 14);
        assert_eq!(heading_font_size(3), 12);
    }

    #[test]
    fn bold_span_splits_into_three_runs() {
        let blocks = convert("Use **Playwright** now");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                runs: vec![
                    Run::plain("Use "),
                    Run::bold("Playwright"),
                    Run::plain(" now"),
                ]
            }]
        );
    }

    #[test]
    fn leading_bold_span_has_no_empty_run() {
        let blocks = convert("**Priority:** high");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                runs: vec![Run::bold("Priority:"), Run::plain(" high")]
            }]
        );
    }

    #[test]
    fn blank_line_becomes_spacer() {
        let blocks = convert("a\n\nb");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[1], Block::Spacer);
    }

    #[test]
    fn bullets_strip_either_prefix() {
        let blocks = convert("* first\n- second");
        assert_eq!(
            blocks,
            vec![
                Block::Bullet {
                    text: "first".to_string()
                },
                Block::Bullet {
                    text: "second".to_string()
                },
            ]
        );
    }

    #[test]
    fn numbered_item_kept_verbatim() {
        let blocks = convert("12. verify checkout");
        assert_eq!(
            blocks,
            vec![Block::Numbered {
                text: "12. verify checkout".to_string()
            }]
        );
    }

    #[test]
    fn numbered_rule_requires_dot_and_space() {
        let blocks = convert("12.verify");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                runs: vec![Run::plain("12.verify")]
            }]
        );
    }

    #[test]
    fn heading_rule_wins_over_bold_rule() {
        let blocks = convert("# Title with **bold**");
        assert_eq!(
            blocks,
            vec![Block::Heading {
                level: 1,
                text: "Title with **bold**".to_string()
            }]
        );
    }

    #[test]
    fn lines_are_trimmed_before_classification() {
        let blocks = convert("   ## Setup   ");
        assert_eq!(
            blocks,
            vec![Block::Heading {
                level: 2,
                text: "Setup".to_string()
            }]
        );
    }

    #[test]
    fn json_round_trip() {
        let doc = StructuredDocument::from_markdown(
            DocumentMetadata {
                title: "Test Plan".to_string(),
                ..Default::default()
            },
            "# Plan\n\n- item\nUse **bold** text",
        );
        let json = doc.to_json().unwrap();
        let parsed = StructuredDocument::from_json(&json).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn json_is_tagged_by_block_type() {
        let doc = StructuredDocument::from_markdown(DocumentMetadata::default(), "# H");
        let json = doc.to_json().unwrap();
        assert!(json.contains("\"type\": \"heading\""));
    }

    #[test]
    fn flatten_restores_readable_text() {
        let doc = StructuredDocument::from_markdown(
            DocumentMetadata::default(),
            "# Plan\n\n- item one\n3. third\nUse **bold** text",
        );
        assert_eq!(
            doc.to_plain_text(),
            "Plan\n\n- item one\n3. third\nUse bold text"
        );
    }

    #[test]
    fn invalid_json_is_rejected() {
        let err = StructuredDocument::from_json("not json").unwrap_err();
        assert!(err.to_string().contains("not a structured document"));
    }
}
