//! Configuration constants, environment loading and input validation.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ClientError, Result};

/// Default base URL of the backend API, as addressed inside docker-compose.
pub const DEFAULT_API_BASE_URL: &str = "http://backend:8080/v1";

/// Timeout for a single fact-check round trip.
pub const FACT_CHECK_TIMEOUT_SECS: u64 = 20;

/// Timeout for fetching the history listing.
pub const HISTORY_TIMEOUT_SECS: u64 = 10;

/// Default Gemini REST endpoint.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default Gemini model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Timeout for a single Gemini generation request.
pub const GEMINI_TIMEOUT_SECS: u64 = 15;

/// User agent string identifying this client.
pub const USER_AGENT: &str = concat!("factcheck-client/", env!("CARGO_PKG_VERSION"));

/// Reject statements that are empty or whitespace only.
///
/// Returns the trimmed statement so callers send what the user meant.
///
/// # Examples
/// ```
/// use factcheck_client::config::validate_statement;
///
/// assert_eq!(validate_statement("  The sky is green. ").unwrap(), "The sky is green.");
/// assert!(validate_statement("   \n\t").is_err());
/// ```
pub fn validate_statement(statement: &str) -> Result<&str> {
    let trimmed = statement.trim();
    if trimmed.is_empty() {
        Err(ClientError::EmptyStatement)
    } else {
        Ok(trimmed)
    }
}

fn parse_secs(value: Option<String>, default: u64) -> Duration {
    Duration::from_secs(value.and_then(|v| v.parse().ok()).unwrap_or(default))
}

/// Connection settings for the fact-checking backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub api_base_url: String,
    pub fact_check_timeout: Duration,
    pub history_timeout: Duration,
}

impl BackendConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let api_base_url = var("FACTCHECK_API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.into());

        Self {
            api_base_url,
            fact_check_timeout: parse_secs(var("FACTCHECK_TIMEOUT_SECS"), FACT_CHECK_TIMEOUT_SECS),
            history_timeout: parse_secs(
                var("FACTCHECK_HISTORY_TIMEOUT_SECS"),
                HISTORY_TIMEOUT_SECS,
            ),
        }
    }

    pub fn new(api_base_url: impl Into<String>) -> Self {
        let api_base_url: String = api_base_url.into();
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            fact_check_timeout: Duration::from_secs(FACT_CHECK_TIMEOUT_SECS),
            history_timeout: Duration::from_secs(HISTORY_TIMEOUT_SECS),
        }
    }

    pub fn with_fact_check_timeout(mut self, timeout: Duration) -> Self {
        self.fact_check_timeout = timeout;
        self
    }

    pub fn with_history_timeout(mut self, timeout: Duration) -> Self {
        self.history_timeout = timeout;
        self
    }

    /// Root of the backend host, i.e. the base URL without its `/v1` suffix.
    ///
    /// The liveness route is mounted there rather than under the API prefix.
    pub fn root_url(&self) -> &str {
        self.api_base_url
            .strip_suffix("/v1")
            .unwrap_or(&self.api_base_url)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

/// Settings for talking to Gemini directly.
///
/// NOTE: Do NOT derive `Debug` on this struct; `api_key` would be exposed.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base_url: String,
    pub timeout: Duration,
    /// Optional prompt template file with a `{statement}` placeholder.
    pub prompt_path: Option<PathBuf>,
}

impl GeminiConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = var("GEMINI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ClientError::Config("GEMINI_API_KEY not set".into()))?;

        let model = var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.into());

        let api_base_url = var("GEMINI_API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.into());

        Ok(Self {
            api_key,
            model,
            api_base_url,
            timeout: parse_secs(var("GEMINI_TIMEOUT_SECS"), GEMINI_TIMEOUT_SECS),
            prompt_path: var("FACTCHECK_PROMPT_PATH").map(PathBuf::from),
        })
    }

    /// Create a config builder for testing.
    pub fn builder(api_key: impl Into<String>) -> GeminiConfigBuilder {
        GeminiConfigBuilder {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.into(),
            api_base_url: DEFAULT_GEMINI_BASE_URL.into(),
            timeout: Duration::from_secs(GEMINI_TIMEOUT_SECS),
            prompt_path: None,
        }
    }
}

/// Builder for constructing `GeminiConfig` in tests.
pub struct GeminiConfigBuilder {
    api_key: String,
    model: String,
    api_base_url: String,
    timeout: Duration,
    prompt_path: Option<PathBuf>,
}

impl GeminiConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn prompt_path(mut self, prompt_path: impl Into<PathBuf>) -> Self {
        self.prompt_path = Some(prompt_path.into());
        self
    }

    pub fn build(self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.api_key,
            model: self.model,
            api_base_url: self.api_base_url,
            timeout: self.timeout,
            prompt_path: self.prompt_path,
        }
    }
}
