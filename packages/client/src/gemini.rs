//! Direct fact-checking against the Gemini API, bypassing the backend.
//!
//! One logical fact-check is one prompt, one JSON completion and one schema
//! validation. The whole cycle runs under a [`RetryPolicy`], so a transport
//! error, a non-JSON completion and a completion that fails validation all
//! count as a failed attempt.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::Span;

use crate::checker::FactChecker;
use crate::config::{validate_statement, GeminiConfig, USER_AGENT};
use crate::error::{ClientError, Result};
use crate::prompt::PromptTemplate;
use crate::retry::RetryPolicy;
use crate::schema::{parse_fact_check_result, FactCheckResult};

/// Harm categories relaxed so that checking offensive claims is not refused.
const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Trait for generative model clients, enabling mocking in tests.
pub trait LlmClient: Send + Sync {
    /// Ask for a JSON-shaped completion and return its raw text.
    fn generate_json(&self, prompt: &str) -> Result<String>;
}

/// Gemini `generateContent` client.
///
/// NOTE: Do NOT derive `Debug` on this struct; `api_key` would be exposed.
pub struct GeminiClient {
    http: Client,
    api_key: String,
    endpoint: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [TextPart<'a>; 1],
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GeminiErrorResponse {
    error: Option<GeminiErrorDetail>,
}

#[derive(Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.api_base_url, config.model
            ),
        })
    }
}

impl LlmClient for GeminiClient {
    fn generate_json(&self, prompt: &str) -> Result<String> {
        let body = GenerateRequest {
            contents: [Content {
                parts: [TextPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|&category| SafetySetting {
                    category,
                    threshold: "BLOCK_NONE",
                })
                .collect(),
        };

        let resp = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body_text = resp.text().unwrap_or_default();
            let message = serde_json::from_str::<GeminiErrorResponse>(&body_text)
                .ok()
                .and_then(|r| r.error)
                .map(|e| e.message)
                .unwrap_or(body_text);
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: message,
            });
        }

        // Decode outside reqwest so a garbage envelope is a Decode error
        let text = resp.text()?;
        let api_response: GenerateResponse = serde_json::from_str(&text)?;

        api_response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .filter(|text| !text.trim().is_empty())
            .ok_or(ClientError::EmptyCompletion)
    }
}

/// Strip a Markdown code fence the model sometimes wraps its JSON in.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

/// Fact-checker that asks the model directly, retrying the whole cycle.
pub struct DirectFactChecker<C: LlmClient> {
    llm: C,
    prompt: PromptTemplate,
    policy: RetryPolicy,
    span: Span,
}

impl DirectFactChecker<GeminiClient> {
    /// Build a Gemini-backed checker from configuration.
    pub fn from_config(config: &GeminiConfig) -> Result<Self> {
        let llm = GeminiClient::new(config)?;
        let prompt = PromptTemplate::from_optional_path(config.prompt_path.as_deref())?;
        let span = tracing::info_span!("gemini", model = %config.model);
        Ok(Self::new(llm, prompt).with_span(span))
    }
}

impl<C: LlmClient> DirectFactChecker<C> {
    pub fn new(llm: C, prompt: PromptTemplate) -> Self {
        Self {
            llm,
            prompt,
            policy: RetryPolicy::default(),
            span: tracing::info_span!("gemini"),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Log under `span` instead of the default `gemini` span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    fn attempt(&self, prompt: &str) -> Result<FactCheckResult> {
        let text = self.llm.generate_json(prompt)?;
        let value: Value = serde_json::from_str(strip_code_fence(&text))?;
        Ok(parse_fact_check_result(&value)?)
    }
}

impl<C: LlmClient> FactChecker for DirectFactChecker<C> {
    fn span(&self) -> &Span {
        &self.span
    }

    fn try_fact_check(&self, statement: &str) -> Result<FactCheckResult> {
        let _guard = self.span.enter();
        let statement = validate_statement(statement)?;
        let prompt = self.prompt.render(statement);

        let result = self.policy.run(|attempt| {
            tracing::debug!(attempt, "Requesting completion");
            self.attempt(&prompt)
        })?;

        tracing::info!(
            statement_length = statement.len(),
            verdict = %result.verdict,
            "Successfully fact-checked statement"
        );
        Ok(result)
    }
}

/// Test utilities for the model client.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_support {
    use super::*;
    use std::sync::Mutex;

    /// Mock model client. Returns pre-configured completions in order.
    pub struct MockLlmClient {
        responses: Mutex<Vec<Result<String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl MockLlmClient {
        pub fn new(responses: Vec<Result<String>>) -> Self {
            // Reverse so we can pop from the end
            let mut responses = responses;
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn with_response(content: &str) -> Self {
            Self::new(vec![Ok(content.to_string())])
        }

        /// Prompts received so far.
        pub fn prompts(&self) -> Vec<String> {
            self.prompts
                .lock()
                .map(|p| p.clone())
                .unwrap_or_default()
        }
    }

    impl LlmClient for MockLlmClient {
        fn generate_json(&self, prompt: &str) -> Result<String> {
            if let Ok(mut prompts) = self.prompts.lock() {
                prompts.push(prompt.to_string());
            }
            let mut responses = self
                .responses
                .lock()
                .map_err(|e| ClientError::Config(format!("mock lock poisoned: {e}")))?;
            responses.pop().unwrap_or(Err(ClientError::EmptyCompletion))
        }
    }
}
