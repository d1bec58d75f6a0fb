//! Bundled installer invocation.
//!
//! The vendor's `aws/install` script copies the distribution into
//! `--install-dir` and links the executables from `--bin-dir` with absolute
//! paths, so it has to target the final cache entry directly.

use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::{CacheEntry, SetupError};

/// Installer location inside the extracted archive.
pub const INSTALLER_PATH: &str = "aws/install";

/// The installer shipped inside an extracted archive.
#[derive(Debug, Clone)]
pub struct BundledInstaller {
    script: PathBuf,
}

impl BundledInstaller {
    /// Point at `<extract_root>/aws/install`.
    pub fn locate(extract_root: &Path) -> Self {
        Self {
            script: extract_root.join(INSTALLER_PATH),
        }
    }

    /// Arguments passed for `entry`.
    pub fn args(entry: &CacheEntry) -> Vec<std::ffi::OsString> {
        vec![
            "--install-dir".into(),
            entry.path().into(),
            "--bin-dir".into(),
            entry.bin_dir().into(),
        ]
    }

    /// Run the installer into `entry` and wait for it to exit.
    pub async fn run(&self, entry: &CacheEntry) -> Result<(), SetupError> {
        let args = Self::args(entry);
        tracing::debug!(
            "Running {} {}",
            self.script.display(),
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let status = Command::new(&self.script)
            .args(&args)
            .status()
            .await
            .map_err(|source| SetupError::InstallerSpawn {
                path: self.script.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(SetupError::InstallerFailed {
                code: status.code(),
            })
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::{Arch, ToolCache};
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn write_script(root: &Path, body: &str) {
        let path = root.join(INSTALLER_PATH);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_args() {
        let cache = ToolCache::new("/cache").unwrap();
        let entry = cache.entry("aws-cli", "2.15.30", Arch::X64).unwrap();
        let args: Vec<String> = BundledInstaller::args(&entry)
            .into_iter()
            .map(|a| a.into_string().unwrap())
            .collect();

        assert_eq!(
            args,
            vec![
                "--install-dir",
                "/cache/aws-cli/2.15.30/x64",
                "--bin-dir",
                "/cache/aws-cli/2.15.30/x64/bin",
            ]
        );
    }

    #[tokio::test]
    async fn test_run_passes_arguments() {
        let tmp = TempDir::new().unwrap();
        let extract = tmp.path().join("extract");
        write_script(
            &extract,
            r#"mkdir -p "$2" "$4" && printf '%s\n' "$@" > "$2/args.txt""#,
        );

        let cache = ToolCache::new(tmp.path().join("cache")).unwrap();
        let entry = cache.entry("aws-cli", "2.15.30", Arch::Arm64).unwrap();

        BundledInstaller::locate(&extract).run(&entry).await.unwrap();

        let recorded = std::fs::read_to_string(entry.path().join("args.txt")).unwrap();
        let expected = format!(
            "--install-dir\n{}\n--bin-dir\n{}\n",
            entry.path().display(),
            entry.bin_dir().display()
        );
        assert_eq!(recorded, expected);
        assert!(entry.bin_dir().is_dir());
    }

    #[tokio::test]
    async fn test_run_nonzero_exit() {
        let tmp = TempDir::new().unwrap();
        write_script(tmp.path(), "exit 3");

        let cache = ToolCache::new(tmp.path().join("cache")).unwrap();
        let entry = cache.entry("aws-cli", "2.15.30", Arch::X64).unwrap();

        let err = BundledInstaller::locate(tmp.path())
            .run(&entry)
            .await
            .unwrap_err();
        assert!(matches!(err, SetupError::InstallerFailed { code: Some(3) }));
        assert_eq!(err.to_string(), "Installer exited with code 3");
    }

    #[tokio::test]
    async fn test_run_missing_installer() {
        let tmp = TempDir::new().unwrap();
        let cache = ToolCache::new(tmp.path().join("cache")).unwrap();
        let entry = cache.entry("aws-cli", "2.15.30", Arch::X64).unwrap();

        let err = BundledInstaller::locate(tmp.path())
            .run(&entry)
            .await
            .unwrap_err();
        assert!(matches!(err, SetupError::InstallerSpawn { .. }));
    }
}
