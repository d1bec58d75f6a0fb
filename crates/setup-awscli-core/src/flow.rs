//! Setup Flow Stage Machine
//!
//! A run moves through these stages in order; a cache hit skips straight from
//! probing to publishing:
//!
//! ```text
//! Validating -> ResolvingVersion -> ProbingCache --(hit)--> Publishing -> Done
//!                                        |                     ^
//!                                      (miss)                  |
//!                                        v                     |
//!                 Fetching -> Extracting -> Installing -> MarkingComplete
//! ```
//!
//! Any stage can fail. The failure is returned as a [`FlowError`] carrying the
//! stage it happened in; nothing is retried or rolled back. A failed install
//! never reaches `MarkingComplete`, so the entry stays a cache miss.
//!
//! # Usage
//!
//! ```ignore
//! let mut publisher = ActionsPublisher::new(path_file, output_file);
//! let tags = GithubTags::new(client.clone(), &config.api_base);
//! let outcome = SetupFlow::new(&config, &client, &tags, &mut publisher)
//!     .run()
//!     .await?;
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use reqwest::Client;
use tempfile::TempDir;
use thiserror::Error;

use crate::cache::{CacheEntry, CacheProbe, TOOL_CACHE_VAR, ToolCache};
use crate::installer::BundledInstaller;
use crate::io::download::{archive_url, download_archive, filename_from_url};
use crate::io::extract::extract_zip;
use crate::resolve::resolve_version;
use crate::{Platform, Publisher, SetupConfig, SetupError, TOOL_NAME, TagSource};

/// Name of the step output carrying the installed version.
pub const VERSION_OUTPUT: &str = "version";

/// Position of a run in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Checking the tool-cache root and host platform.
    Validating,
    /// Turning the request into a concrete version.
    ResolvingVersion,
    /// Looking for a completed install in the tool cache.
    ProbingCache,
    /// Downloading the archive.
    Fetching,
    /// Unpacking the archive.
    Extracting,
    /// Running the bundled installer.
    Installing,
    /// Writing the completion marker.
    MarkingComplete,
    /// Exposing the bin directory and version output.
    Publishing,
    /// Finished successfully.
    Done,
}

impl Stage {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::ResolvingVersion => "resolving version",
            Self::ProbingCache => "probing cache",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::Installing => "installing",
            Self::MarkingComplete => "marking complete",
            Self::Publishing => "publishing",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed run: the stage it stopped in and why.
#[derive(Error, Debug)]
#[error("setup failed while {stage}")]
pub struct FlowError {
    /// Stage that was active when the error occurred.
    pub stage: Stage,
    /// Underlying error.
    #[source]
    pub source: SetupError,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupOutcome {
    /// Resolved version, without prefix.
    pub version: String,
    /// Cache entry the tool lives in.
    pub install_dir: PathBuf,
    /// Directory added to the search path.
    pub bin_dir: PathBuf,
    /// Whether a previous install was reused.
    pub cache_hit: bool,
}

/// One run of the installer with its collaborators.
pub struct SetupFlow<'a> {
    config: &'a SetupConfig,
    client: &'a Client,
    tags: &'a dyn TagSource,
    publisher: &'a mut dyn Publisher,
    stage: Stage,
}

impl fmt::Debug for SetupFlow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetupFlow")
            .field("config", &self.config)
            .field("stage", &self.stage)
            .finish_non_exhaustive()
    }
}

impl<'a> SetupFlow<'a> {
    /// Wire up a run. Nothing happens until [`run`](Self::run).
    pub fn new(
        config: &'a SetupConfig,
        client: &'a Client,
        tags: &'a dyn TagSource,
        publisher: &'a mut dyn Publisher,
    ) -> Self {
        Self {
            config,
            client,
            tags,
            publisher,
            stage: Stage::Validating,
        }
    }

    /// Drive the run to `Done` or to the first failure.
    pub async fn run(mut self) -> Result<SetupOutcome, FlowError> {
        let result = self.drive().await;
        result.map_err(|source| FlowError {
            stage: self.stage,
            source,
        })
    }

    fn enter(&mut self, stage: Stage) {
        tracing::debug!("{} -> {}", self.stage, stage);
        self.stage = stage;
    }

    async fn drive(&mut self) -> Result<SetupOutcome, SetupError> {
        self.enter(Stage::Validating);
        let root = self
            .config
            .tool_cache_root
            .clone()
            .ok_or(SetupError::MissingToolCache {
                var: TOOL_CACHE_VAR,
            })?;
        let cache = ToolCache::new(root)?;
        let platform = Platform::parse(&self.config.os, &self.config.arch)?;
        tracing::debug!("Platform {platform}, tool cache {}", cache.root().display());

        self.enter(Stage::ResolvingVersion);
        let version = resolve_version(&self.config.requested, self.tags).await?;

        self.enter(Stage::ProbingCache);
        let entry = cache.entry(TOOL_NAME, &version, platform.arch)?;
        let cache_hit = cache.find(TOOL_NAME, &version, platform.arch).is_some();

        if cache_hit {
            tracing::info!("Found {TOOL_NAME} {version} in tool cache");
        } else {
            self.install(&entry, platform, &version).await?;
        }

        self.enter(Stage::Publishing);
        let bin_dir = entry.bin_dir();
        self.publisher.add_path(&bin_dir)?;
        self.publisher.set_output(VERSION_OUTPUT, &version)?;
        tracing::info!("Installed {TOOL_NAME} version {version}");

        self.enter(Stage::Done);
        Ok(SetupOutcome {
            version,
            install_dir: entry.path().to_path_buf(),
            bin_dir,
            cache_hit,
        })
    }

    async fn install(
        &mut self,
        entry: &CacheEntry,
        platform: Platform,
        version: &str,
    ) -> Result<(), SetupError> {
        self.enter(Stage::Fetching);
        let scratch = scratch_dir(self.config.temp_root.as_deref())?;
        let url = archive_url(&self.config.download_base, platform.arch, version);
        tracing::info!("Downloading from {url}");
        let archive = scratch.path().join(filename_from_url(&url));
        download_archive(self.client, &url, &archive).await?;

        self.enter(Stage::Extracting);
        tracing::info!("Extracting zip archive: {}", archive.display());
        let extract_root = scratch.path().join("extract");
        let dest = extract_root.clone();
        let files = tokio::task::spawn_blocking(move || extract_zip(&archive, &dest))
            .await
            .map_err(std::io::Error::other)??;
        tracing::debug!("Extracted {} files", files.len());

        self.enter(Stage::Installing);
        BundledInstaller::locate(&extract_root).run(entry).await?;

        self.enter(Stage::MarkingComplete);
        entry.mark_complete().await?;
        Ok(())
    }
}

fn scratch_dir(temp_root: Option<&Path>) -> Result<TempDir, SetupError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("setup-awscli-");
    let dir = match temp_root {
        Some(root) => {
            std::fs::create_dir_all(root)?;
            builder.tempdir_in(root)?
        }
        None => builder.tempdir()?,
    };
    Ok(dir)
}
