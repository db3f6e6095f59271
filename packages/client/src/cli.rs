//! Command-line interface for the fact-check client.

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::backend::BackendClient;
use crate::checker::FactChecker;
use crate::config::{validate_statement, BackendConfig, GeminiConfig};
use crate::error::Result;
use crate::gemini::DirectFactChecker;
use crate::logging::{LogFormat, LoggingConfig};
use crate::schema::{FactCheckResult, HistoryRecord, Verdict};

/// Text wrap width for reasoning and context paragraphs.
pub const TEXT_WRAP_WIDTH: usize = 100;

/// Real-time AI fact-checker.
#[derive(Parser)]
#[command(name = "factcheck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log at info level (RUST_LOG still wins)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormatArg::Text, global = true)]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check a statement for factual accuracy.
    Check {
        /// The statement to fact-check (e.g., "The Eiffel Tower is in London.")
        statement: String,

        /// Ask Gemini directly instead of going through the backend
        #[arg(long)]
        direct: bool,
    },

    /// Show all previously checked statements.
    History,

    /// Probe whether the backend is up.
    Health,
}

impl Cli {
    pub fn logging_config(&self) -> LoggingConfig {
        let format = match self.log_format {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        };
        LoggingConfig::default()
            .verbose(self.verbose)
            .with_format(format)
    }
}

/// Run a parsed command.
pub fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Check { statement, direct } => check_command(&statement, direct),
        Commands::History => history_command(),
        Commands::Health => health_command(),
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Execute the check command.
fn check_command(statement: &str, direct: bool) -> Result<ExitCode> {
    // Reject blank input before building any client
    let statement = validate_statement(statement)?;

    let checker: Box<dyn FactChecker> = if direct {
        Box::new(DirectFactChecker::from_config(&GeminiConfig::from_env()?)?)
    } else {
        Box::new(BackendClient::new(BackendConfig::from_env())?)
    };

    let pb = spinner(if direct {
        "Asking Gemini... The AI is thinking"
    } else {
        "Contacting the backend... The AI is thinking"
    });
    let result = checker.fetch_fact_check(statement);
    pb.finish_and_clear();

    match result {
        Some(result) => {
            println!("{}", render_result(&result));
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!(
                "{} Could not get a valid response from the {}. Please ensure it is running and accessible.",
                style("Error:").red().bold(),
                if direct { "Gemini API" } else { "backend API" }
            );
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Execute the history command.
fn history_command() -> Result<ExitCode> {
    let client = BackendClient::new(BackendConfig::from_env())?;

    let pb = spinner("Fetching history...");
    let history = client.fetch_history();
    pb.finish_and_clear();

    match history {
        Some(records) if records.is_empty() => {
            println!(
                "{}",
                style("No fact-checks have been made yet. Run `factcheck check` to analyze a statement!")
                    .cyan()
            );
            Ok(ExitCode::SUCCESS)
        }
        Some(records) => {
            println!("{}", render_history(&records));
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!(
                "{} Failed to fetch history from the backend. Please ensure the backend server is running.",
                style("Error:").red().bold()
            );
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Execute the health command.
fn health_command() -> Result<ExitCode> {
    let client = BackendClient::new(BackendConfig::from_env())?;
    if client.health() {
        println!("{} {}", style("Backend is up:").green().bold(), client.config().root_url());
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!(
            "{} {}",
            style("Backend is not reachable:").red().bold(),
            client.config().root_url()
        );
        Ok(ExitCode::FAILURE)
    }
}

fn wrap(text: &str) -> String {
    let options = textwrap::Options::new(TEXT_WRAP_WIDTH)
        .initial_indent("  ")
        .subsequent_indent("  ");
    textwrap::fill(text, options)
}

fn verdict_line(verdict: Verdict) -> String {
    let label = format!("Verdict: {verdict}");
    match verdict {
        Verdict::True => format!("✅ {}", style(label).green().bold()),
        Verdict::False => format!("❌ {}", style(label).red().bold()),
        Verdict::Uncertain => format!("🤔 {}", style(label).yellow().bold()),
    }
}

/// Format a fresh result for the terminal.
pub fn render_result(result: &FactCheckResult) -> String {
    let mut lines = vec![
        style("Analysis Complete").bold().to_string(),
        verdict_line(result.verdict),
        format!("Confidence Level: {}", style(result.confidence).cyan()),
        String::new(),
        style("Reasoning:").bold().to_string(),
        wrap(&result.reason),
        String::new(),
        style("Additional Context:").bold().to_string(),
        wrap(&result.additional_context),
    ];

    if !result.sources.is_empty() {
        lines.push(String::new());
        lines.push(style("Sources:").bold().to_string());
        for (i, source) in result.sources.iter().enumerate() {
            lines.push(format!("  {}. {} <{}>", i + 1, source.title, source.url));
        }
    }

    lines.join("\n")
}

/// Format the history listing for the terminal.
pub fn render_history(records: &[HistoryRecord]) -> String {
    records
        .iter()
        .map(|record| {
            [
                format!(
                    "{} - Verdict: {}",
                    style(record.statement.trim()).bold(),
                    style(&record.verdict).bold()
                ),
                format!("  Confidence: {}", record.confidence),
                "  Reasoning:".to_string(),
                wrap(&record.reason),
                "  Additional Context:".to_string(),
                wrap(&record.additional_context),
                format!("  {}", style(format!("Checked on: {}", record.created_at)).dim()),
            ]
            .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
