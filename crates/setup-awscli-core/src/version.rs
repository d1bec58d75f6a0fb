//! Version input parsing and tag selection.

use std::fmt;

use semver::{Comparator, Op, Prerelease, Version, VersionReq};

/// Major version every resolved `latest` must carry.
pub const MAJOR: u64 = 2;

/// Sentinel input meaning "newest v2 release".
pub const LATEST: &str = "latest";

/// What the user asked for, after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestedVersion {
    /// Resolve against the upstream tag listing.
    #[default]
    Latest,
    /// Install this version as-is. Not checked against upstream.
    Exact(String),
}

impl RequestedVersion {
    /// Normalize raw input.
    ///
    /// Empty input means `latest`. A leading `v` is always dropped; any other
    /// single non-digit character is dropped only when a digit follows it. So
    /// `v2.15.30` and `2.15.30` are the same request, as are `vlatest` and
    /// `latest`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let normalized = strip_prefix_char(trimmed);

        if normalized.is_empty() || normalized == LATEST {
            Self::Latest
        } else {
            Self::Exact(normalized.to_string())
        }
    }
}

impl fmt::Display for RequestedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str(LATEST),
            Self::Exact(v) => f.write_str(v),
        }
    }
}

fn strip_prefix_char(s: &str) -> &str {
    if let Some(rest) = s.strip_prefix('v') {
        return rest;
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) if !first.is_ascii_digit() && second.is_ascii_digit() => {
            &s[first.len_utf8()..]
        }
        _ => s,
    }
}

/// The `^2` requirement `latest` is resolved against.
pub fn major_constraint() -> VersionReq {
    VersionReq {
        comparators: vec![Comparator {
            op: Op::Caret,
            major: MAJOR,
            minor: None,
            patch: None,
            pre: Prerelease::EMPTY,
        }],
    }
}

/// Pick the highest tag satisfying `req`.
///
/// Tags are compared as semver after stripping a leading `v`; tags that do not
/// parse are ignored. The returned string has no prefix.
pub fn highest_matching(tags: &[String], req: &VersionReq) -> Option<String> {
    let mut candidates: Vec<(Version, &str)> = tags
        .iter()
        .filter_map(|tag| {
            let bare = tag.strip_prefix('v').unwrap_or(tag);
            Version::parse(bare).ok().map(|v| (v, bare))
        })
        .filter(|(v, _)| req.matches(v))
        .collect();

    // Sort descending: newer versions first
    candidates.sort_by(|a, b| b.0.cmp(&a.0));
    candidates.first().map(|(_, bare)| (*bare).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    fn major_two() -> VersionReq {
        major_constraint()
    }

    #[test]
    fn test_major_constraint() {
        assert_eq!(major_constraint(), VersionReq::parse("^2").unwrap());
        assert_eq!(major_constraint().to_string(), "^2");
    }

    #[test]
    fn test_parse_latest() {
        assert_eq!(RequestedVersion::parse("latest"), RequestedVersion::Latest);
        assert_eq!(RequestedVersion::parse(""), RequestedVersion::Latest);
        assert_eq!(RequestedVersion::parse("  "), RequestedVersion::Latest);
    }

    #[test]
    fn test_parse_strips_prefix() {
        assert_eq!(
            RequestedVersion::parse("v2.15.30"),
            RequestedVersion::Exact("2.15.30".to_string())
        );
        assert_eq!(
            RequestedVersion::parse("2.15.30"),
            RequestedVersion::Exact("2.15.30".to_string())
        );
    }

    #[test]
    fn test_parse_keeps_non_numeric_words() {
        // Only a single character ahead of a digit is a prefix.
        assert_eq!(
            RequestedVersion::parse("nightly"),
            RequestedVersion::Exact("nightly".to_string())
        );
        assert_eq!(
            RequestedVersion::parse("x-2"),
            RequestedVersion::Exact("x-2".to_string())
        );
    }

    #[test]
    fn test_parse_strips_v_before_latest() {
        assert_eq!(RequestedVersion::parse("vlatest"), RequestedVersion::Latest);
        assert_eq!(RequestedVersion::parse(" v "), RequestedVersion::Latest);
        assert_eq!(
            RequestedVersion::parse("vnext"),
            RequestedVersion::Exact("next".to_string())
        );
    }

    #[test]
    fn test_highest_matching_picks_max() {
        let listed = tags(&["2.15.28", "2.15.30", "2.15.29", "1.32.0", "2.9.1"]);
        assert_eq!(
            highest_matching(&listed, &major_two()),
            Some("2.15.30".to_string())
        );
    }

    #[test]
    fn test_highest_matching_uses_semver_order() {
        // 2.10.0 > 2.9.9 numerically, not lexically
        let listed = tags(&["2.9.9", "2.10.0"]);
        assert_eq!(
            highest_matching(&listed, &major_two()),
            Some("2.10.0".to_string())
        );
    }

    #[test]
    fn test_highest_matching_ignores_other_majors_and_junk() {
        let listed = tags(&["1.99.0", "3.0.0", "not-a-version", "2.0.0-rc.1", "v2.1.0"]);
        assert_eq!(
            highest_matching(&listed, &major_two()),
            Some("2.1.0".to_string())
        );
    }

    #[test]
    fn test_highest_matching_none() {
        let listed = tags(&["1.32.0", "1.31.9"]);
        assert_eq!(highest_matching(&listed, &major_two()), None);
        assert_eq!(highest_matching(&[], &major_two()), None);
    }
}
