//! Prompt template for the direct Gemini variant.

use std::fs;
use std::path::Path;

use crate::error::{ClientError, Result};

/// Placeholder replaced by the user's statement.
pub const STATEMENT_PLACEHOLDER: &str = "{statement}";

const DEFAULT_TEMPLATE: &str = r#"You are an expert AI fact-checker. Your sole purpose is to analyze a statement
and return a structured JSON response. Do not add any conversational text or
markdown formatting.

Analyze the following statement: "{statement}"

Respond ONLY with a JSON object in this exact format:
{
  "verdict": "True", "False", or "Uncertain",
  "confidence": "Low", "Medium", or "High",
  "reason": "Your brief reasoning here.",
  "additional_context": "Additional clarifying facts here."
}
"#;

/// A prompt with a single `{statement}` slot.
///
/// Template files use Python format-string escaping: `{{` and `}}` stand for
/// literal braces, so a JSON example in the prompt survives. Lone braces are
/// kept as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    before: String,
    after: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        let (before, after) = DEFAULT_TEMPLATE
            .split_once(STATEMENT_PLACEHOLDER)
            .unwrap_or((DEFAULT_TEMPLATE, ""));
        Self {
            before: before.to_string(),
            after: after.to_string(),
        }
    }
}

impl PromptTemplate {
    /// Parse a template string. It must contain the placeholder exactly once.
    pub fn new(template: impl AsRef<str>) -> Result<Self> {
        let mut parts = Vec::new();
        let mut current = String::new();
        let mut rest = template.as_ref();

        while let Some(c) = rest.chars().next() {
            let step = if rest.starts_with("{{") {
                current.push('{');
                2
            } else if rest.starts_with("}}") {
                current.push('}');
                2
            } else if rest.starts_with(STATEMENT_PLACEHOLDER) {
                parts.push(std::mem::take(&mut current));
                STATEMENT_PLACEHOLDER.len()
            } else {
                current.push(c);
                c.len_utf8()
            };
            rest = &rest[step..];
        }
        parts.push(current);

        match <[String; 2]>::try_from(parts) {
            Ok([before, after]) => Ok(Self { before, after }),
            Err(parts) => Err(ClientError::Config(format!(
                "prompt template must contain {STATEMENT_PLACEHOLDER} exactly once, found {}",
                parts.len() - 1
            ))),
        }
    }

    /// Read a template from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let template = fs::read_to_string(path)?;
        Self::new(template)
    }

    /// Load from `path` when given, otherwise use the built-in template.
    pub fn from_optional_path(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Substitute the statement into the template.
    pub fn render(&self, statement: &str) -> String {
        format!("{}{}{}", self.before, statement, self.after)
    }
}
