//! Prompt composition for generation jobs.
//!
//! A composed prompt is the task instruction template followed by the
//! extracted source-document text, joined by a fixed separator and a
//! labeled section header. Composition is pure concatenation: deterministic
//! given identical inputs, no retry semantics, nothing persisted outside the
//! scratch workspace.

mod template;

pub use template::{TemplateError, render_template, vars};

/// Separator between the instruction template and the source section.
pub const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// Compose the full prompt payload for one generation job.
///
/// The output is exactly `template + separator + label + ":\n\n" + source_text`.
/// The label introduces the source content to the generator (for example
/// "PRD CONTENT TO ANALYZE").
pub fn compose(template: &str, label: &str, source_text: &str) -> String {
    format!("{template}{SECTION_SEPARATOR}{label}:\n\n{source_text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_has_exact_shape() {
        let out = compose("Write a test plan.", "PRD CONTENT TO ANALYZE", "The product does X.");
        assert_eq!(
            out,
            "Write a test plan.\n\n---\n\nPRD CONTENT TO ANALYZE:\n\nThe product does X."
        );
    }

    #[test]
    fn compose_is_deterministic() {
        let a = compose("template", "LABEL", "source");
        let b = compose("template", "LABEL", "source");
        assert_eq!(a, b);
    }

    #[test]
    fn compose_preserves_source_verbatim() {
        let source = "line one\n\n  indented\n```fenced```\n";
        let out = compose("t", "L", source);
        assert!(out.ends_with(source));
    }

    #[test]
    fn compose_with_empty_source_keeps_header() {
        let out = compose("t", "CONTENT", "");
        assert_eq!(out, "t\n\n---\n\nCONTENT:\n\n");
    }
}
