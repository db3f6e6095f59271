//! The seam the presentation layer talks to.
//!
//! Both the backend client and the direct Gemini variant implement
//! [`FactChecker`]. Callers only ever see `Some(result)` or `None`; the
//! reason for a `None` goes to the log.

use tracing::Span;

use crate::error::{ClientError, Result};
use crate::schema::FactCheckResult;

/// Anything that can turn a statement into a validated fact-check.
pub trait FactChecker {
    /// Span the implementation logs under.
    fn span(&self) -> &Span;

    /// Run one logical fact-check, reporting why it failed.
    fn try_fact_check(&self, statement: &str) -> Result<FactCheckResult>;

    /// Run one logical fact-check, collapsing every failure into `None`.
    fn fetch_fact_check(&self, statement: &str) -> Option<FactCheckResult> {
        match self.try_fact_check(statement) {
            Ok(result) => Some(result),
            Err(e) => {
                let _guard = self.span().enter();
                log_failure("fact-check", &e);
                None
            }
        }
    }
}

/// Log a failure with a message that tells unreachable apart from garbage.
pub(crate) fn log_failure(operation: &str, err: &ClientError) {
    match err {
        ClientError::EmptyStatement => {
            tracing::warn!(operation, "Rejected empty statement");
        }
        e if e.is_validation() => {
            tracing::error!(operation, error = %e, "Response validation error");
        }
        e => {
            tracing::error!(operation, error = %e, "Request error");
        }
    }
}
