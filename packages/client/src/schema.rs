//! Typed contract for the JSON the backend and the model return.
//!
//! Fresh fact-check results are validated strictly: an unknown verdict or
//! confidence, a missing text field or one malformed source rejects the
//! whole payload. History records describe data the backend already stored,
//! so their verdict and confidence stay plain strings.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Three-way classification of a statement's truthfulness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    True,
    False,
    Uncertain,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::True => "True",
            Verdict::False => "False",
            Verdict::Uncertain => "Uncertain",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-reported certainty tier for a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "Low",
            Confidence::Medium => "Medium",
            Confidence::High => "High",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cited reference supporting a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
}

/// A freshly computed fact-check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactCheckResult {
    pub verdict: Verdict,
    pub confidence: Confidence,
    pub reason: String,
    pub additional_context: String,
    /// Absent in the direct model output; never null.
    #[serde(default)]
    pub sources: Vec<Source>,
}

/// A previously computed and persisted fact-check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: i64,
    pub statement: String,
    pub verdict: String,
    pub confidence: String,
    pub reason: String,
    pub additional_context: String,
    /// Backend-formatted timestamp, shown verbatim.
    pub created_at: String,
}

/// A JSON value did not match the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Validate a fact-check result payload.
///
/// # Examples
/// ```
/// use factcheck_client::schema::{parse_fact_check_result, Verdict};
///
/// let value = serde_json::json!({
///     "verdict": "False",
///     "confidence": "High",
///     "reason": "The Eiffel Tower is located in Paris, France.",
///     "additional_context": "It was completed in 1889."
/// });
/// let result = parse_fact_check_result(&value).unwrap();
/// assert_eq!(result.verdict, Verdict::False);
/// assert!(result.sources.is_empty());
///
/// let maybe = serde_json::json!({
///     "verdict": "Maybe",
///     "confidence": "High",
///     "reason": "",
///     "additional_context": ""
/// });
/// assert!(parse_fact_check_result(&maybe).is_err());
/// ```
pub fn parse_fact_check_result(value: &Value) -> Result<FactCheckResult, ValidationError> {
    Ok(FactCheckResult::deserialize(value)?)
}

/// Validate a single history record.
pub fn parse_history_record(value: &Value) -> Result<HistoryRecord, ValidationError> {
    Ok(HistoryRecord::deserialize(value)?)
}

/// Validate a whole history listing.
///
/// All-or-nothing: the first malformed record fails the listing, and the
/// error names its index.
pub fn parse_history(value: &Value) -> Result<Vec<HistoryRecord>, ValidationError> {
    let items = value
        .as_array()
        .ok_or_else(|| ValidationError::new("expected a JSON array of history records"))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            parse_history_record(item)
                .map_err(|e| ValidationError::new(format!("history record {index}: {e}")))
        })
        .collect()
}
