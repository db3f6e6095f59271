//! Process-wide tracing setup.
//!
//! Called once from `main`. Library code never touches the subscriber; each
//! client carries its own span instead (see `BackendClient::with_span`).

use tracing_subscriber::EnvFilter;

use crate::error::{ClientError, Result};

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// How the subscriber should be configured.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set.
    pub default_filter: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_filter: "warn".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl LoggingConfig {
    /// Verbose runs log at info and above.
    pub fn verbose(mut self, verbose: bool) -> Self {
        if verbose {
            self.default_filter = "info".to_string();
        }
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_filter))
    }
}

/// Install the global subscriber.
///
/// Fails instead of panicking when a subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_target(false)
        .with_writer(std::io::stderr);

    let installed = match config.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed.map_err(|e| ClientError::Config(format!("failed to initialise logging: {e}")))
}
