//! setup-awscli - install AWS CLI v2 into a runner tool cache
//!
//! Every input has a flag and the environment variable the GitHub Actions
//! runner provides, so the binary works both as an action entry point and
//! from a shell.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use setup_awscli_core::io::download::DOWNLOAD_BASE;
use setup_awscli_core::publish::escape_data;
use setup_awscli_core::tags::GITHUB_API_URL;
use setup_awscli_core::{
    ActionsPublisher, GithubTags, SetupConfig, SetupFlow, SetupOutcome, USER_AGENT,
};

/// Install AWS CLI v2 and add it to PATH
#[derive(Debug, Parser)]
#[command(name = "setup-awscli")]
#[command(author)]
pub struct Cli {
    /// Version to install: a version such as 2.15.30 (a leading "v" is
    /// accepted) or "latest"
    #[arg(long, env = "INPUT_VERSION", default_value = "latest")]
    pub version: String,

    /// Root of the local tool cache
    #[arg(long, env = "RUNNER_TOOL_CACHE")]
    pub tool_cache: Option<PathBuf>,

    /// Directory for downloads and extraction
    #[arg(long, env = "RUNNER_TEMP")]
    pub temp_dir: Option<PathBuf>,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = GITHUB_API_URL)]
    pub api_url: String,

    /// Base URL archives are downloaded from
    #[arg(long, env = "SETUP_AWSCLI_DOWNLOAD_BASE", default_value = DOWNLOAD_BASE)]
    pub download_base: String,

    /// File receiving PATH additions
    #[arg(long, env = "GITHUB_PATH")]
    pub path_file: Option<PathBuf>,

    /// File receiving step outputs
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output_file: Option<PathBuf>,
}

impl Cli {
    /// Build the run configuration for the current host.
    pub fn config(&self) -> SetupConfig {
        SetupConfig::new(&self.version)
            .with_tool_cache(self.tool_cache.clone())
            .with_temp_root(self.temp_dir.clone())
            .with_api_base(&self.api_url)
            .with_download_base(&self.download_base)
    }

    /// Publisher writing to the runner's command files.
    pub fn publisher(&self) -> ActionsPublisher {
        ActionsPublisher::new(self.path_file.clone(), self.output_file.clone())
    }
}

/// Run one setup with the collaborators described by `cli`.
pub async fn run(cli: &Cli) -> Result<SetupOutcome> {
    let config = cli.config();
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")?;
    let tags = GithubTags::new(client.clone(), &config.api_base);
    let mut publisher = cli.publisher();

    let outcome = SetupFlow::new(&config, &client, &tags, &mut publisher)
        .run()
        .await?;
    Ok(outcome)
}

/// The single failure line printed for any error.
///
/// Formatted as an Actions `::error::` workflow command so the runner shows
/// it as an annotation; data is escaped per the workflow command rules.
pub fn failure_report(err: &anyhow::Error) -> String {
    let message = format!("Action failed with error {err:#}");
    format!("::error::{}", escape_data(&message))
}
