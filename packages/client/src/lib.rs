//! FactCheck client - validated contract and resilient client for a
//! fact-checking backend.
//!
//! Sends a free-text statement either to the fact-checking backend over HTTP
//! or straight to Gemini, and only ever hands back results that passed
//! schema validation. Every failure is logged and collapsed into `None`.
//!
//! # Example
//!
//! ```
//! use factcheck_client::schema::parse_fact_check_result;
//!
//! let value = serde_json::json!({
//!     "verdict": "True",
//!     "confidence": "Medium",
//!     "reason": "Water boils at 100 degrees Celsius at sea level.",
//!     "additional_context": "The boiling point drops with altitude."
//! });
//! assert!(parse_fact_check_result(&value).is_ok());
//! ```
//!
//! # Architecture
//!
//! - [`schema`]: Result and history types, JSON validation
//! - [`error`]: Error types and Result alias
//! - [`config`]: Environment configuration and input validation
//! - [`retry`]: Fixed-delay retry combinator
//! - [`checker`]: The `FactChecker` seam used by the presentation layer
//! - [`backend`]: HTTP client for the backend API
//! - [`prompt`]: Prompt template for the direct variant
//! - [`gemini`]: Direct Gemini client wrapped in the retry policy
//! - [`logging`]: Tracing subscriber setup
//! - [`cli`]: Command-line interface

pub mod backend;
pub mod checker;
pub mod cli;
pub mod config;
pub mod error;
pub mod gemini;
pub mod logging;
pub mod prompt;
pub mod retry;
pub mod schema;

// Re-export commonly used items
pub use backend::BackendClient;
pub use checker::FactChecker;
pub use config::{validate_statement, BackendConfig, GeminiConfig};
pub use error::{ClientError, Result};
pub use gemini::{DirectFactChecker, GeminiClient, LlmClient};
pub use retry::RetryPolicy;
pub use schema::{Confidence, FactCheckResult, HistoryRecord, Source, ValidationError, Verdict};
