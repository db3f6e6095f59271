//! HTTP client for the fact-checking backend.
//!
//! One round trip per call, no retries. A failed call is the caller's cue to
//! let the user try again.

use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::Span;

use crate::checker::{log_failure, FactChecker};
use crate::config::{validate_statement, BackendConfig, USER_AGENT};
use crate::error::{ClientError, Result};
use crate::schema::{parse_fact_check_result, parse_history, FactCheckResult, HistoryRecord};

#[derive(Serialize)]
struct FactCheckRequest<'a> {
    statement: &'a str,
}

#[derive(Deserialize)]
struct HealthResponse {
    status: String,
}

/// Client for `POST /fact-check`, `GET /history` and the liveness check.
pub struct BackendClient {
    http: Client,
    config: BackendConfig,
    span: Span,
}

impl BackendClient {
    /// Create a client. Timeouts are applied per request from `config`.
    pub fn new(config: BackendConfig) -> Result<Self> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        let span = tracing::info_span!("backend", base_url = %config.api_base_url);
        Ok(Self { http, config, span })
    }

    /// Log under `span` instead of the default `backend` span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Fetch every stored fact-check, or `None` if anything went wrong.
    ///
    /// An empty store yields `Some(vec![])`, not `None`.
    pub fn fetch_history(&self) -> Option<Vec<HistoryRecord>> {
        match self.try_history() {
            Ok(history) => Some(history),
            Err(e) => {
                let _guard = self.span.enter();
                log_failure("history", &e);
                None
            }
        }
    }

    /// Fetch the history listing, reporting why it failed.
    ///
    /// One malformed record fails the whole listing.
    pub fn try_history(&self) -> Result<Vec<HistoryRecord>> {
        let _guard = self.span.enter();
        let url = format!("{}/history", self.config.api_base_url);
        tracing::info!(url = %url, "Requesting fact-check history");

        let response = self
            .http
            .get(&url)
            .timeout(self.config.history_timeout)
            .send()?;
        let value = json_body(response)?;
        let history = parse_history(&value)?;

        tracing::info!(records = history.len(), "History received");
        Ok(history)
    }

    /// True when the backend reports itself as up.
    pub fn health(&self) -> bool {
        match self.try_health() {
            Ok(status) => status == "UP",
            Err(e) => {
                let _guard = self.span.enter();
                log_failure("health", &e);
                false
            }
        }
    }

    /// Fetch the raw status string from the liveness route.
    pub fn try_health(&self) -> Result<String> {
        let _guard = self.span.enter();
        let url = format!("{}/health", self.config.root_url());

        let response = self
            .http
            .get(&url)
            .timeout(self.config.history_timeout)
            .send()?;
        let value = json_body(response)?;
        let health = HealthResponse::deserialize(&value)?;

        tracing::debug!(status = %health.status, "Health check answered");
        Ok(health.status)
    }
}

impl FactChecker for BackendClient {
    fn span(&self) -> &Span {
        &self.span
    }

    fn try_fact_check(&self, statement: &str) -> Result<FactCheckResult> {
        let _guard = self.span.enter();
        let statement = validate_statement(statement)?;
        let url = format!("{}/fact-check", self.config.api_base_url);
        tracing::info!(statement_length = statement.len(), "Requesting fact-check");

        let response = self
            .http
            .post(&url)
            .timeout(self.config.fact_check_timeout)
            .json(&FactCheckRequest { statement })
            .send()?;
        let value = json_body(response)?;
        let result = parse_fact_check_result(&value)?;

        tracing::info!(
            verdict = %result.verdict,
            confidence = %result.confidence,
            sources = result.sources.len(),
            "Fact-check received"
        );
        Ok(result)
    }
}

/// Turn a response into JSON, treating non-success statuses as errors.
fn json_body(response: Response) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(ClientError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let text = response.text()?;
    Ok(serde_json::from_str(&text)?)
}
