//! Domain-specific errors for a setup run

use std::path::PathBuf;

use thiserror::Error;

use crate::io::download::DownloadError;
use crate::io::extract::ExtractError;

/// Errors raised by any stage of a setup run.
#[derive(Error, Debug)]
pub enum SetupError {
    /// No listed tag satisfies the major-version constraint.
    #[error("Failed to resolve latest version: no tag matching {constraint} in [{}]", .candidates.join(", "))]
    NoMatchingTag {
        /// Constraint the tags were filtered with.
        constraint: String,
        /// Tag names returned by the listing.
        candidates: Vec<String>,
    },

    /// A required environment value is missing or empty.
    #[error("Environment variable {var} not set")]
    MissingToolCache {
        /// Name of the variable.
        var: &'static str,
    },

    /// A requested version that cannot name a cache directory.
    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    /// Host operating system outside the supported set.
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Host CPU architecture outside the supported set.
    #[error("Unsupported architecture: {0}")]
    UnsupportedArch(String),

    /// Listing upstream tags failed.
    #[error("Failed to list tags: {0}")]
    TagListing(#[from] reqwest::Error),

    /// Fetching the archive failed.
    #[error("Download failed: {0}")]
    Download(#[from] DownloadError),

    /// Unpacking the archive failed.
    #[error("Extraction failed: {0}")]
    Extract(#[from] ExtractError),

    /// The bundled installer could not be started.
    #[error("Failed to run installer {}: {source}", .path.display())]
    InstallerSpawn {
        /// Installer path that was executed.
        path: PathBuf,
        /// Underlying spawn error.
        source: std::io::Error,
    },

    /// The bundled installer exited unsuccessfully.
    #[error("Installer exited with {}", .code.map_or_else(|| "a signal".to_string(), |c| format!("code {c}")))]
    InstallerFailed {
        /// Exit code, `None` when terminated by a signal.
        code: Option<i32>,
    },

    /// Filesystem error outside of download and extraction.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
