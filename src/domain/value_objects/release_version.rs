use node_semver::Version;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReleaseVersionError {
    #[error("Invalid version '{0}': expected MAJOR.MINOR.PATCH")]
    InvalidVersion(String),
}

/// A version about to be released, e.g. `6.2.0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseVersion {
    version: Version,
}

impl ReleaseVersion {
    pub fn major(&self) -> u64 {
        self.version.major
    }

    pub fn minor(&self) -> u64 {
        self.version.minor
    }

    pub fn patch(&self) -> u64 {
        self.version.patch
    }

    /// Name of the release branch, `MAJOR.MINOR.x`.
    pub fn release_branch(&self) -> String {
        format!("{}.{}.x", self.version.major, self.version.minor)
    }

    /// Version the default branch moves to once the release branch is cut.
    pub fn next_dev_version(&self) -> String {
        format!("{}.{}.0-dev", self.version.major, self.version.minor + 1)
    }

    /// Patch releases reuse an existing release branch.
    pub fn is_patch_release(&self) -> bool {
        self.version.patch > 0
    }
}

impl FromStr for ReleaseVersion {
    type Err = ReleaseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.starts_with('v') || trimmed.starts_with('=') {
            return Err(ReleaseVersionError::InvalidVersion(s.to_string()));
        }
        Version::parse(trimmed)
            .map(|version| Self { version })
            .map_err(|_| ReleaseVersionError::InvalidVersion(s.to_string()))
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version)
    }
}

/// Pick the greatest semantic-version tag out of `git tag --list` output.
///
/// With a `prefix`, only tags named `<prefix>-<version>` are considered and
/// the prefix is stripped before parsing. Tags that do not parse as a
/// semantic version, legacy `r` tags included, are discarded. Returns the tag
/// as written in the repository.
pub fn select_most_recent_tag<'a, I>(tags: I, prefix: Option<&str>) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let prefix = prefix.map(|p| format!("{}-", p));
    let mut best: Option<(Version, &'a str)> = None;

    for tag in tags.into_iter().map(str::trim).filter(|t| !t.is_empty()) {
        let unprefixed = match &prefix {
            Some(prefix) => match tag.strip_prefix(prefix.as_str()) {
                Some(rest) => rest,
                None => continue,
            },
            None => tag,
        };
        let version = match Version::parse(unprefixed) {
            Ok(version) => version,
            Err(_) => continue,
        };
        let replace = match &best {
            Some((current, _)) => version > *current,
            None => true,
        };
        if replace {
            best = Some((version, tag));
        }
    }

    best.map(|(_, tag)| tag.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_version_parse() {
        let version: ReleaseVersion = "6.2.0".parse().unwrap();
        assert_eq!(version.major(), 6);
        assert_eq!(version.minor(), 2);
        assert_eq!(version.patch(), 0);
        assert_eq!(version.to_string(), "6.2.0");
    }

    #[test]
    fn test_release_version_rejects_garbage() {
        assert!("6.2".parse::<ReleaseVersion>().is_err());
        assert!("banana".parse::<ReleaseVersion>().is_err());
        assert!("v6.2.0".parse::<ReleaseVersion>().is_err());
    }

    #[test]
    fn test_release_branch_and_next_dev_version() {
        let version: ReleaseVersion = "6.2.0".parse().unwrap();
        assert_eq!(version.release_branch(), "6.2.x");
        assert_eq!(version.next_dev_version(), "6.3.0-dev");
        assert!(!version.is_patch_release());

        let patch: ReleaseVersion = "6.2.3".parse().unwrap();
        assert_eq!(patch.release_branch(), "6.2.x");
        assert!(patch.is_patch_release());
    }

    #[test]
    fn test_most_recent_tag_legacy_r_prefix() {
        // Regression: the legacy r-prefixed tag never wins.
        let tags = ["1.2.0", "1.3.0", "r2.0.0"];
        assert_eq!(
            select_most_recent_tag(tags, None),
            Some("1.3.0".to_string())
        );
    }

    #[test]
    fn test_most_recent_tag_is_semantic_not_lexical() {
        let tags = ["1.9.0", "1.10.0", "1.2.0"];
        assert_eq!(
            select_most_recent_tag(tags, None),
            Some("1.10.0".to_string())
        );
    }

    #[test]
    fn test_most_recent_tag_skips_non_semver() {
        let tags = ["nightly", "2.0.0-rc.1", "latest", "1.0.0", ""];
        assert_eq!(
            select_most_recent_tag(tags, None),
            Some("2.0.0-rc.1".to_string())
        );
        assert_eq!(select_most_recent_tag(["nightly", "foo"], None), None);
        assert_eq!(select_most_recent_tag(Vec::<&str>::new(), None), None);
    }

    #[test]
    fn test_most_recent_tag_with_prefix() {
        let tags = ["cordova-common-2.0.0", "cordova-common-2.1.0", "3.0.0"];
        assert_eq!(
            select_most_recent_tag(tags, Some("cordova-common")),
            Some("cordova-common-2.1.0".to_string())
        );
    }
}
