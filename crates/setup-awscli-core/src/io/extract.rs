//! Archive extraction module
//!
//! The vendor ships a zip whose entries carry unix modes. Executable bits and
//! symlinks are restored so the bundled installer can run straight from the
//! extraction directory.
//!
//! Nothing is written outside the destination: entry names must stay
//! enclosed, symlink targets must resolve inside the tree, and no entry is
//! written through a symlink created by an earlier entry.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use zip::ZipArchive;

/// Failures while unpacking an archive.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Filesystem error while writing entries.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Corrupt or unreadable archive.
    #[error("Archive error: {0}")]
    Archive(String),
}

impl From<zip::result::ZipError> for ExtractError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Archive(err.to_string())
    }
}

/// Information about an extracted file
#[derive(Debug, Clone)]
pub struct ExtractedFile {
    /// Path relative to extraction root
    pub relative_path: PathBuf,
    /// Absolute path on disk
    pub absolute_path: PathBuf,
    /// Whether this is an executable
    pub is_executable: bool,
}

const S_IFMT: u32 = 0o170_000;
const S_IFLNK: u32 = 0o120_000;

/// Extract a zip archive into `dest_dir`, creating it if needed.
pub fn extract_zip(
    archive_path: &Path,
    dest_dir: &Path,
) -> Result<Vec<ExtractedFile>, ExtractError> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;

    fs::create_dir_all(dest_dir)?;
    let mut extracted_files = Vec::new();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;

        // Sanitize path to prevent Zip Slip
        let Some(relative_path) = entry.enclosed_name() else {
            return Err(ExtractError::Archive(format!(
                "Invalid path in archive: {}",
                entry.name()
            )));
        };

        let absolute_path = dest_dir.join(&relative_path);
        let mode = entry.unix_mode();
        let is_symlink = mode.is_some_and(|m| m & S_IFMT == S_IFLNK);

        // A link entry may replace an earlier link at its own path
        reject_symlinked_path(dest_dir, &relative_path, !is_symlink)?;

        if entry.is_dir() {
            fs::create_dir_all(&absolute_path)?;
            continue;
        }

        if let Some(parent) = absolute_path.parent() {
            fs::create_dir_all(parent)?;
        }

        if is_symlink {
            let mut target = String::new();
            entry.read_to_string(&mut target)?;
            let target = Path::new(&target);
            if !link_stays_inside(&relative_path, target) {
                return Err(ExtractError::Archive(format!(
                    "Symlink {} points outside the archive: {}",
                    relative_path.display(),
                    target.display()
                )));
            }
            create_symlink(target, &absolute_path)?;
            continue;
        }

        let mut outfile = File::create(&absolute_path)?;
        io::copy(&mut entry, &mut outfile)?;

        let is_executable = apply_mode(&absolute_path, mode)?;

        extracted_files.push(ExtractedFile {
            relative_path,
            absolute_path,
            is_executable,
        });
    }

    Ok(extracted_files)
}

/// Fail if `relative_path` (or only its ancestors, when `include_self` is
/// false) already exists under `dest_dir` as a symlink.
fn reject_symlinked_path(
    dest_dir: &Path,
    relative_path: &Path,
    include_self: bool,
) -> Result<(), ExtractError> {
    let skip = usize::from(!include_self);
    for prefix in relative_path.ancestors().skip(skip) {
        if prefix.as_os_str().is_empty() {
            continue;
        }
        let is_link = dest_dir
            .join(prefix)
            .symlink_metadata()
            .is_ok_and(|m| m.file_type().is_symlink());
        if is_link {
            return Err(ExtractError::Archive(format!(
                "Refusing to write {} through symlink {}",
                relative_path.display(),
                prefix.display()
            )));
        }
    }
    Ok(())
}

/// Depth below the root after walking `path` from `start`, or `None` if the
/// walk leaves the root or the path is absolute.
fn walk_depth(start: usize, path: &Path) -> Option<usize> {
    let mut depth = start;
    for component in path.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => depth = depth.checked_sub(1)?,
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(depth)
}

/// Whether a link at `link` (relative to the root) pointing at `target`
/// resolves inside the root.
fn link_stays_inside(link: &Path, target: &Path) -> bool {
    let parent = link.parent().unwrap_or_else(|| Path::new(""));
    walk_depth(0, parent).is_some_and(|depth| walk_depth(depth, target).is_some())
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    if link.symlink_metadata().is_ok() {
        fs::remove_file(link)?;
    }
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    let resolved = link.parent().map_or_else(|| target.to_path_buf(), |p| p.join(target));
    fs::copy(resolved, link).map(|_| ())
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: Option<u32>) -> io::Result<bool> {
    use std::os::unix::fs::PermissionsExt;

    let Some(mode) = mode else {
        return Ok(false);
    };
    fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777))?;
    Ok(mode & 0o111 != 0)
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: Option<u32>) -> io::Result<bool> {
    Ok(false)
}
