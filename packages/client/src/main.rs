//! CLI entry point for the fact-check client.

use std::process::ExitCode;

use clap::Parser;
use console::style;
use factcheck_client::cli::{self, Cli};
use factcheck_client::{logging, ClientError};

fn main() -> ExitCode {
    // A missing .env file is fine; real environment variables still apply
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!(
                "{} Ignoring .env file: {e}",
                style("Warning:").yellow().bold()
            );
        }
    }

    let cli = Cli::parse();

    if let Err(e) = logging::init(&cli.logging_config()) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    match cli::run(cli) {
        Ok(code) => code,
        Err(ClientError::EmptyStatement) => {
            eprintln!(
                "{} Please enter a statement to analyze.",
                style("Warning:").yellow().bold()
            );
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
