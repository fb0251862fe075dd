//! `{variable}` substitution for command templates.
//!
//! Used to render the external generator command line (`{model}`,
//! `{prompt_file}`) and the optional extractor command (`{input}`).
//! Undefined variables are an error rather than a silent empty substitution,
//! so a typo in a config template fails before any process is spawned.
//!
//! `{{` and `}}` render as literal braces.

use std::collections::HashMap;
use thiserror::Error;

/// Error type for template rendering failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A variable was referenced but not provided.
    #[error("undefined variable '{name}' at position {position} in template")]
    UndefinedVariable { name: String, position: usize },

    /// A `{` was found without a matching `}`.
    #[error("unmatched '{{' at position {position} in template")]
    UnmatchedBrace { position: usize },

    /// An empty variable name (`{}`) was found.
    #[error("empty variable name at position {position} in template")]
    EmptyVariableName { position: usize },
}

/// Render a template string by substituting `{variable}` placeholders.
pub fn render_template(
    template: &str,
    variables: &HashMap<String, String>,
) -> Result<String, TemplateError> {
    let mut result = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '{' => {
                if let Some((_, '{')) = chars.peek() {
                    chars.next();
                    result.push('{');
                    continue;
                }

                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, c)) => name.push(c),
                        None => return Err(TemplateError::UnmatchedBrace { position: pos }),
                    }
                }

                let name = name.trim();
                if name.is_empty() {
                    return Err(TemplateError::EmptyVariableName { position: pos });
                }

                match variables.get(name) {
                    Some(value) => result.push_str(value),
                    None => {
                        return Err(TemplateError::UndefinedVariable {
                            name: name.to_string(),
                            position: pos,
                        });
                    }
                }
            }
            '}' => {
                if let Some((_, '}')) = chars.peek() {
                    chars.next();
                }
                result.push('}');
            }
            _ => result.push(ch),
        }
    }

    Ok(result)
}

/// Build a variables map from key-value pairs.
pub fn vars<I, K, V>(pairs: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_variables() {
        let v = vars([("model", "gemini-2.5-pro"), ("prompt_file", "/tmp/p.txt")]);
        let out = render_template("gemini --model {model} < {prompt_file}", &v).unwrap();
        assert_eq!(out, "gemini --model gemini-2.5-pro < /tmp/p.txt");
    }

    #[test]
    fn undefined_variable_is_an_error() {
        let v = vars([("model", "m")]);
        let err = render_template("run {model} {missing}", &v).unwrap_err();
        assert!(matches!(
            err,
            TemplateError::UndefinedVariable { ref name, .. } if name == "missing"
        ));
    }

    #[test]
    fn unmatched_brace_is_an_error() {
        let v = HashMap::new();
        let err = render_template("run {model", &v).unwrap_err();
        assert!(matches!(err, TemplateError::UnmatchedBrace { position: 4 }));
    }

    #[test]
    fn empty_variable_name_is_an_error() {
        let v = HashMap::new();
        let err = render_template("run {}", &v).unwrap_err();
        assert!(matches!(err, TemplateError::EmptyVariableName { .. }));
    }

    #[test]
    fn escaped_braces_render_literally() {
        let v = HashMap::new();
        let out = render_template("use {{model}} literally", &v).unwrap();
        assert_eq!(out, "use {model} literally");
    }

    #[test]
    fn whitespace_in_variable_names_is_trimmed() {
        let v = vars([("model", "m")]);
        let out = render_template("{ model }", &v).unwrap();
        assert_eq!(out, "m");
    }

    #[test]
    fn template_without_variables_passes_through() {
        let v = HashMap::new();
        let out = render_template("plain command --flag", &v).unwrap();
        assert_eq!(out, "plain command --flag");
    }
}
