//! Run configuration.

use std::path::PathBuf;

use crate::io::download::DOWNLOAD_BASE;
use crate::tags::GITHUB_API_URL;
use crate::version::RequestedVersion;

/// Everything a single run reads from its environment.
///
/// Nothing here is validated on construction; [`crate::SetupFlow`] checks the
/// tool-cache root and platform before doing any work.
#[derive(Debug, Clone)]
pub struct SetupConfig {
    /// Normalized version request.
    pub requested: RequestedVersion,
    /// Root of the local tool cache (`RUNNER_TOOL_CACHE`).
    pub tool_cache_root: Option<PathBuf>,
    /// Host operating system name.
    pub os: String,
    /// Host CPU architecture name.
    pub arch: String,
    /// Base URL archives are fetched from.
    pub download_base: String,
    /// GitHub REST base URL.
    pub api_base: String,
    /// Scratch directory parent (`RUNNER_TEMP`); system temp dir if `None`.
    pub temp_root: Option<PathBuf>,
}

impl SetupConfig {
    /// Configuration for `requested` on the current host with default endpoints.
    pub fn new(requested: &str) -> Self {
        Self {
            requested: RequestedVersion::parse(requested),
            tool_cache_root: None,
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            download_base: DOWNLOAD_BASE.to_string(),
            api_base: GITHUB_API_URL.to_string(),
            temp_root: None,
        }
    }

    /// Set the tool-cache root. Empty paths are treated as unset.
    pub fn with_tool_cache(mut self, root: Option<PathBuf>) -> Self {
        self.tool_cache_root = root.filter(|p| !p.as_os_str().is_empty());
        self
    }

    /// Override the host platform strings.
    pub fn with_platform(mut self, os: &str, arch: &str) -> Self {
        self.os = os.to_string();
        self.arch = arch.to_string();
        self
    }

    /// Override the archive download base URL.
    pub fn with_download_base(mut self, base: &str) -> Self {
        self.download_base = base.to_string();
        self
    }

    /// Override the GitHub API base URL.
    pub fn with_api_base(mut self, base: &str) -> Self {
        self.api_base = base.to_string();
        self
    }

    /// Set the scratch directory parent.
    pub fn with_temp_root(mut self, root: Option<PathBuf>) -> Self {
        self.temp_root = root.filter(|p| !p.as_os_str().is_empty());
        self
    }
}
