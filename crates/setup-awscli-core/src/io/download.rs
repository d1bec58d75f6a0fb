//! Archive download.
//!
//! Streams the vendor zip to disk. The archive is not checksummed or
//! signature-checked before it is unpacked and executed.

use std::path::Path;

use futures::StreamExt;
use reqwest::Client;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::Arch;

/// Default download host for AWS CLI v2 archives.
pub const DOWNLOAD_BASE: &str = "https://awscli.amazonaws.com";

/// Failures while fetching an archive.
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Connection failure or non-success status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Writing the archive to disk failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the archive URL for `version` on `arch`.
///
/// # Example
///
/// ```
/// use setup_awscli_core::Arch;
/// use setup_awscli_core::io::download::archive_url;
///
/// assert_eq!(
///     archive_url("https://awscli.amazonaws.com", Arch::X64, "2.15.30"),
///     "https://awscli.amazonaws.com/awscli-exe-linux-x86_64-2.15.30.zip"
/// );
/// ```
pub fn archive_url(base: &str, arch: Arch, version: &str) -> String {
    format!(
        "{}/awscli-exe-linux-{}-{version}.zip",
        base.trim_end_matches('/'),
        arch.vendor_label()
    )
}

/// Extract the filename from a URL.
pub fn filename_from_url(url: &str) -> &str {
    url.split('/').next_back().unwrap_or("")
}

/// Download `url` into `dest`, returning the number of bytes written.
pub async fn download_archive(
    client: &Client,
    url: &str,
    dest: &Path,
) -> Result<u64, DownloadError> {
    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
        .send()
        .await?
        .error_for_status()?;

    let total_size = response.content_length();
    tracing::debug!(?total_size, "Saving archive to {}", dest.display());

    let mut file = File::create(dest).await?;
    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;
    }

    file.flush().await?;
    tracing::debug!(downloaded, "Archive not verified (no checksum published)");

    Ok(downloaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use tempfile::TempDir;

    #[test]
    fn test_archive_url_per_arch() {
        assert_eq!(
            archive_url(DOWNLOAD_BASE, Arch::X64, "2.15.30"),
            "https://awscli.amazonaws.com/awscli-exe-linux-x86_64-2.15.30.zip"
        );
        assert_eq!(
            archive_url(DOWNLOAD_BASE, Arch::Arm64, "2.0.1"),
            "https://awscli.amazonaws.com/awscli-exe-linux-aarch64-2.0.1.zip"
        );
    }

    #[test]
    fn test_filename_from_url() {
        let url = archive_url(DOWNLOAD_BASE, Arch::X64, "2.15.30");
        assert_eq!(filename_from_url(&url), "awscli-exe-linux-x86_64-2.15.30.zip");
        assert_eq!(filename_from_url(""), "");
    }

    #[test]
    fn test_archive_url_trailing_slash() {
        assert_eq!(
            archive_url("http://127.0.0.1:1234/", Arch::X64, "2.1.0"),
            "http://127.0.0.1:1234/awscli-exe-linux-x86_64-2.1.0.zip"
        );
    }

    #[tokio::test]
    async fn test_download_writes_body() {
        let mut server = Server::new_async().await;
        let body = vec![7u8; 64 * 1024];
        let m = server
            .mock("GET", "/awscli-exe-linux-x86_64-2.15.30.zip")
            .with_status(200)
            .with_body(&body)
            .create_async()
            .await;

        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("awscli.zip");
        let url = archive_url(&server.url(), Arch::X64, "2.15.30");

        let written = download_archive(&Client::new(), &url, &dest).await.unwrap();

        assert_eq!(written, body.len() as u64);
        assert_eq!(std::fs::read(&dest).unwrap(), body);
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_download_not_found() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/awscli-exe-linux-x86_64-9.9.9.zip")
            .with_status(404)
            .create_async()
            .await;

        let tmp = TempDir::new().unwrap();
        let url = archive_url(&server.url(), Arch::X64, "9.9.9");
        let err = download_archive(&Client::new(), &url, &tmp.path().join("a.zip"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DownloadError::Http(ref e) if e.status() == Some(reqwest::StatusCode::NOT_FOUND)
        ));
    }
}
