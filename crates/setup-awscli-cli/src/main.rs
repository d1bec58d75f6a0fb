//! setup-awscli CLI

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use setup_awscli_cli::{Cli, failure_report, run};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli).await {
        Ok(outcome) => {
            tracing::debug!(?outcome, "Setup finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{err:#}");
            println!("{}", failure_report(&err));
            ExitCode::FAILURE
        }
    }
}
