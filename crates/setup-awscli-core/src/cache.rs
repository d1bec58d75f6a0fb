//! Tool cache lookups and completion markers.
//!
//! Entries follow the hosted runner layout, `<root>/<tool>/<version>/<arch>`.
//! An entry only counts once `<root>/<tool>/<version>/<arch>.complete`
//! exists next to it; a directory without a marker is a leftover from a failed
//! install and is treated as absent.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::{Arch, SetupError};

/// Environment variable naming the tool-cache root.
pub const TOOL_CACHE_VAR: &str = "RUNNER_TOOL_CACHE";

/// Local lookup of previously completed installs. Never touches the network.
pub trait CacheProbe {
    /// Install directory for `(tool, version, arch)` if it completed before.
    fn find(&self, tool: &str, version: &str, arch: Arch) -> Option<PathBuf>;
}

/// Root of the runner's tool cache.
#[derive(Debug, Clone)]
pub struct ToolCache {
    root: PathBuf,
}

impl ToolCache {
    /// Wrap an existing root. An empty path is a configuration error.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, SetupError> {
        let root = root.into();
        if root.as_os_str().is_empty() {
            return Err(SetupError::MissingToolCache {
                var: TOOL_CACHE_VAR,
            });
        }
        Ok(Self { root })
    }

    /// Cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Entry location for `(tool, version, arch)`, whether or not it exists.
    ///
    /// `version` must be a single path component; anything that could climb
    /// out of or replace the root is rejected.
    pub fn entry(
        &self,
        tool: &str,
        version: &str,
        arch: Arch,
    ) -> Result<CacheEntry, SetupError> {
        if !is_path_component(version) {
            return Err(SetupError::InvalidVersion(version.to_string()));
        }
        Ok(CacheEntry {
            path: self
                .root
                .join(tool)
                .join(version)
                .join(arch.cache_label()),
        })
    }
}

fn is_path_component(s: &str) -> bool {
    !s.is_empty() && s != "." && s != ".." && !s.contains(['/', '\\', '\0'])
}

impl CacheProbe for ToolCache {
    fn find(&self, tool: &str, version: &str, arch: Arch) -> Option<PathBuf> {
        let entry = self.entry(tool, version, arch).ok()?;
        if entry.is_complete() {
            tracing::debug!("Found in cache: {}", entry.path().display());
            Some(entry.path)
        } else {
            None
        }
    }
}

/// A single versioned install directory in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    path: PathBuf,
}

impl CacheEntry {
    /// Install root (`--install-dir`).
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Binary directory (`--bin-dir`).
    pub fn bin_dir(&self) -> PathBuf {
        self.path.join("bin")
    }

    /// Sibling marker file, `<path>.complete`.
    pub fn marker_path(&self) -> PathBuf {
        let mut marker = OsString::from(self.path.as_os_str());
        marker.push(".complete");
        PathBuf::from(marker)
    }

    /// Whether a previous install into this entry finished.
    pub fn is_complete(&self) -> bool {
        self.path.is_dir() && self.marker_path().is_file()
    }

    /// Write the zero-byte completion marker.
    pub async fn mark_complete(&self) -> Result<(), SetupError> {
        let marker = self.marker_path();
        if let Some(parent) = marker.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&marker, b"").await?;
        tracing::debug!("Wrote marker {}", marker.display());
        Ok(())
    }
}
