//! Artifact parsing for raw generator output.
//!
//! Two variants, selected by the job's output kind:
//!
//! - **single-document**: the whole output, with fence-marker lines stripped,
//!   is one artifact body.
//! - **multi-artifact**: a line lexer over the grammar
//!   `document := block*`, `block := open_fence(tag), body, close_fence`.
//!   A block is accepted only when its first non-blank line starts with the
//!   required header prefix; anything else (wrong header, unclosed fence) is
//!   skipped and counted. Zero accepted blocks is a hard failure — a
//!   generation that parsed to nothing must not look like success.
//!
//! Derived names are filesystem-safe slugs. Collisions are not deduplicated;
//! a later block with the same name overwrites the earlier file at write time.

use super::Artifact;
use crate::error::{ForgeError, Result};

/// Result of multi-artifact parsing.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    /// Accepted artifacts, in order of appearance.
    pub artifacts: Vec<Artifact>,
    /// Fenced blocks dropped for a missing or malformed header.
    pub skipped: usize,
}

/// Parse a single-document result: strip fence-marker lines and trim.
///
/// The generator often wraps the whole response (or sections of it) in
/// fenced code blocks; only the content matters. An empty body after
/// stripping is a parse failure.
pub fn parse_single(raw: &str) -> Result<String> {
    let body: Vec<&str> = raw
        .lines()
        .filter(|line| !is_fence_line(line))
        .collect();
    let body = body.join("\n").trim().to_string();

    if body.is_empty() {
        return Err(ForgeError::ParseYieldedNothing(
            "generated output contained no document content".to_string(),
        ));
    }
    Ok(body)
}

/// Parse a multi-artifact result into one artifact per valid fenced block.
pub fn parse_blocks(
    raw: &str,
    fence_tag: &str,
    header_prefix: &str,
    extension: &str,
) -> Result<ParseOutcome> {
    let open_marker = format!("```{fence_tag}");
    let mut artifacts = Vec::new();
    let mut skipped = 0usize;

    let mut lines = raw.lines();
    while let Some(line) = lines.next() {
        if line.trim() != open_marker {
            continue;
        }

        // Collect the block body up to the closing fence.
        let mut body_lines = Vec::new();
        let mut closed = false;
        for inner in lines.by_ref() {
            if inner.trim_start().starts_with("```") {
                closed = true;
                break;
            }
            body_lines.push(inner);
        }

        if !closed {
            skipped += 1;
            break;
        }

        match accept_block(&body_lines, header_prefix, extension) {
            Some(artifact) => artifacts.push(artifact),
            None => skipped += 1,
        }
    }

    if artifacts.is_empty() {
        return Err(ForgeError::ParseYieldedNothing(format!(
            "no valid artifact blocks found in generated output \
             (expected ```{fence_tag} blocks whose first line starts with '{header_prefix}'; \
             {skipped} malformed block(s) skipped)"
        )));
    }

    Ok(ParseOutcome { artifacts, skipped })
}

/// Accept a block whose first meaningful line carries the header prefix.
fn accept_block(body_lines: &[&str], header_prefix: &str, extension: &str) -> Option<Artifact> {
    let body = body_lines.join("\n").trim().to_string();
    let first = body.lines().next()?.trim();
    let title = first.strip_prefix(header_prefix)?.trim().to_string();

    let slug = slugify(&title);
    if slug.is_empty() {
        return None;
    }

    Some(Artifact {
        file_name: format!("{slug}.{extension}"),
        title,
        body,
    })
}

fn is_fence_line(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

/// Normalize a header into a filesystem-safe token: lowercase, runs of
/// non-alphanumerics collapsed to a single `-`, no leading or trailing `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_document_strips_wrapping_fences() {
        let raw = "```markdown\n# Test Plan\n\n- item\n```\n";
        assert_eq!(parse_single(raw).unwrap(), "# Test Plan\n\n- item");
    }

    #[test]
    fn single_document_strips_interior_fences_too() {
        let raw = "intro\n```javascript\nconst x = 1;\n```\noutro";
        assert_eq!(parse_single(raw).unwrap(), "intro\nconst x = 1;\noutro");
    }

    #[test]
    fn single_document_without_fences_is_trimmed_verbatim() {
        assert_eq!(parse_single("  body text\n").unwrap(), "body text");
    }

    #[test]
    fn fence_only_output_yields_nothing() {
        let err = parse_single("```\n```\n").unwrap_err();
        assert!(matches!(err, ForgeError::ParseYieldedNothing(_)));
    }

    #[test]
    fn parses_one_valid_feature_block() {
        let raw = "Here are the features:\n\
                   ```gherkin\n\
                   Feature: Login\n\
                   \x20 Scenario: Valid credentials\n\
                   \x20   Given the login page\n\
                   ```\n";
        let outcome = parse_blocks(raw, "gherkin", "Feature:", "feature").unwrap();

        assert_eq!(outcome.artifacts.len(), 1);
        assert_eq!(outcome.skipped, 0);
        let artifact = &outcome.artifacts[0];
        assert_eq!(artifact.file_name, "login.feature");
        assert_eq!(artifact.title, "Login");
        assert!(artifact.body.starts_with("Feature: Login"));
        assert!(artifact.body.contains("Given the login page"));
    }

    #[test]
    fn valid_blocks_survive_invalid_neighbors() {
        let raw = "```gherkin\n\
                   Feature: Login\n\
                   body\n\
                   ```\n\
                   ```gherkin\n\
                   not a feature header\n\
                   ```\n\
                   ```gherkin\n\
                   Feature: Checkout Flow\n\
                   body\n\
                   ```\n";
        let outcome = parse_blocks(raw, "gherkin", "Feature:", "feature").unwrap();

        assert_eq!(outcome.artifacts.len(), 2);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.artifacts[1].file_name, "checkout-flow.feature");
    }

    #[test]
    fn blocks_with_other_tags_are_not_blocks() {
        let raw = "```javascript\nFeature: Not Gherkin\n```\n\
                   ```gherkin\nFeature: Real\n```\n";
        let outcome = parse_blocks(raw, "gherkin", "Feature:", "feature").unwrap();

        assert_eq!(outcome.artifacts.len(), 1);
        assert_eq!(outcome.artifacts[0].title, "Real");
        // the javascript block is prose to this lexer, not a skipped block
        assert_eq!(outcome.skipped, 0);
    }

    #[test]
    fn unclosed_fence_is_skipped() {
        let raw = "```gherkin\nFeature: Dangling\nno close fence";
        let err = parse_blocks(raw, "gherkin", "Feature:", "feature").unwrap_err();
        assert!(matches!(err, ForgeError::ParseYieldedNothing(_)));
    }

    #[test]
    fn zero_valid_blocks_is_a_hard_failure() {
        let raw = "no fenced blocks at all";
        let err = parse_blocks(raw, "gherkin", "Feature:", "feature").unwrap_err();
        assert!(err.to_string().contains("no valid artifact blocks"));
    }

    #[test]
    fn order_of_appearance_is_preserved() {
        let raw = "```gherkin\nFeature: B\n```\n```gherkin\nFeature: A\n```\n";
        let outcome = parse_blocks(raw, "gherkin", "Feature:", "feature").unwrap();
        let names: Vec<_> = outcome.artifacts.iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(names, vec!["b.feature", "a.feature"]);
    }

    #[test]
    fn leading_blank_lines_before_header_are_tolerated() {
        let raw = "```gherkin\n\n\nFeature: Spaced\nbody\n```\n";
        let outcome = parse_blocks(raw, "gherkin", "Feature:", "feature").unwrap();
        assert_eq!(outcome.artifacts[0].title, "Spaced");
    }

    #[test]
    fn slug_is_filesystem_safe() {
        assert_eq!(slugify("Login"), "login");
        assert_eq!(slugify("Checkout Flow"), "checkout-flow");
        assert_eq!(slugify("User's Cart (v2)!"), "user-s-cart-v2");
        assert_eq!(slugify("  spaced  out  "), "spaced-out");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn slug_has_no_leading_or_trailing_separators() {
        for input in ["!start", "end!", "!!both!!", "a  b"] {
            let slug = slugify(input);
            assert!(!slug.starts_with('-'), "input {input:?} -> {slug:?}");
            assert!(!slug.ends_with('-'), "input {input:?} -> {slug:?}");
            assert!(!slug.contains("--"), "input {input:?} -> {slug:?}");
        }
    }
}
