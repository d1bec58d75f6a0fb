//! Upstream tag listing.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::SetupError;

/// Default GitHub REST endpoint.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// A remote repository that can list its most recent tags.
#[async_trait]
pub trait TagSource: Send + Sync {
    /// Return up to `limit` tag names, most recent first.
    async fn recent_tags(
        &self,
        owner: &str,
        repo: &str,
        limit: u8,
    ) -> Result<Vec<String>, SetupError>;
}

#[derive(Debug, Deserialize)]
struct GithubTag {
    name: String,
}

/// Unauthenticated GitHub tag listing.
#[derive(Debug, Clone)]
pub struct GithubTags {
    client: Client,
    api_base: String,
}

impl GithubTags {
    /// Create a tag source against `api_base` (e.g. [`GITHUB_API_URL`]).
    pub fn new(client: Client, api_base: &str) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    fn tags_url(&self, owner: &str, repo: &str) -> String {
        format!("{}/repos/{owner}/{repo}/tags", self.api_base)
    }
}

#[async_trait]
impl TagSource for GithubTags {
    async fn recent_tags(
        &self,
        owner: &str,
        repo: &str,
        limit: u8,
    ) -> Result<Vec<String>, SetupError> {
        let url = self.tags_url(owner, repo);
        tracing::debug!(%url, limit, "Listing tags");

        let tags: Vec<GithubTag> = self
            .client
            .get(&url)
            .query(&[("per_page", limit)])
            .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(tags.into_iter().map(|t| t.name).collect())
    }
}
