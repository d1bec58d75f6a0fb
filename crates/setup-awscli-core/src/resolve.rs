//! Version resolution.
//!
//! `latest` costs exactly one tag listing; an explicit version costs nothing
//! and is trusted. A version that does not exist upstream surfaces later as a
//! failed download.

use crate::SetupError;
use crate::tags::TagSource;
use crate::version::{RequestedVersion, highest_matching, major_constraint};

/// Owner of the upstream repository.
pub const UPSTREAM_OWNER: &str = "aws";
/// Upstream repository name.
pub const UPSTREAM_REPO: &str = "aws-cli";
/// Number of most recent tags considered for `latest`.
pub const TAG_PAGE_SIZE: u8 = 5;

/// Turn a request into a concrete version string without prefix.
pub async fn resolve_version(
    requested: &RequestedVersion,
    tags: &dyn TagSource,
) -> Result<String, SetupError> {
    match requested {
        RequestedVersion::Exact(version) => Ok(version.clone()),
        RequestedVersion::Latest => {
            let listed = tags
                .recent_tags(UPSTREAM_OWNER, UPSTREAM_REPO, TAG_PAGE_SIZE)
                .await?;
            tracing::debug!("Listed tags: {}", listed.join(", "));

            let req = major_constraint();
            let version =
                highest_matching(&listed, &req).ok_or_else(|| SetupError::NoMatchingTag {
                    constraint: req.to_string(),
                    candidates: listed.clone(),
                })?;

            tracing::info!("Resolved latest version: {version}");
            Ok(version)
        }
    }
}
