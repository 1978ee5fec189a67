use crate::domain::tag::version_from_tag;
use crate::domain::version::{BumpCategory, Version};
use crate::error::{GitReleaseError, Result};
use chrono::{DateTime, Utc};
use std::str::FromStr;

/// Branch categories that have a configured name prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Feature,
    Hotfix,
    Release,
}

impl FromStr for BranchKind {
    type Err = GitReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "feature" => Ok(BranchKind::Feature),
            "hotfix" => Ok(BranchKind::Hotfix),
            "release" => Ok(BranchKind::Release),
            other => Err(GitReleaseError::branch(format!(
                "Unknown branch type: '{}' - expected feature, hotfix, or release",
                other
            ))),
        }
    }
}

/// Compute the release branch name for a version (`{release_prefix}{version}`)
pub fn release_branch_name(release_prefix: &str, version: &Version) -> String {
    format!("{}{}", release_prefix, version)
}

/// Derive the hotfix branch name from a base tag.
///
/// The tag prefix is stripped if present, the recovered version is
/// patch-bumped, and the hotfix prefix is applied.
pub fn hotfix_branch_name(
    hotfix_prefix: &str,
    tag_prefix: &str,
    base_tag: &str,
) -> Result<String> {
    let version = version_from_tag(base_tag, tag_prefix).ok_or_else(|| {
        GitReleaseError::tag(format!(
            "Cannot derive hotfix version from tag '{}'",
            base_tag
        ))
    })?;
    Ok(format!(
        "{}{}",
        hotfix_prefix,
        version.bump(BumpCategory::Patch)
    ))
}

/// Compute the rollback branch name for a tag.
///
/// The timestamp keeps repeated rollbacks of the same tag unique.
pub fn rollback_branch_name(tag: &str, at: DateTime<Utc>) -> String {
    format!("rollback-to-{}-{}", tag, at.format("%Y%m%d%H%M%S"))
}

/// Compute a generic named branch (`{prefix_for_kind}{name}`).
///
/// The prefix comes from the configuration entry for the branch kind;
/// resolving an unknown kind fails earlier in [BranchKind::from_str].
pub fn named_branch(prefix: &str, name: &str) -> String {
    format!("{}{}", prefix, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_branch_kind_from_str() {
        assert_eq!("feature".parse::<BranchKind>().unwrap(), BranchKind::Feature);
        assert_eq!("Hotfix".parse::<BranchKind>().unwrap(), BranchKind::Hotfix);
        assert_eq!("release".parse::<BranchKind>().unwrap(), BranchKind::Release);
        assert!("bugfix".parse::<BranchKind>().is_err());
    }

    #[test]
    fn test_release_branch_name() {
        let v = Version::new(2, 1, 0);
        assert_eq!(release_branch_name("release/", &v), "release/2.1.0");
    }

    #[test]
    fn test_hotfix_branch_name_strips_prefix_and_bumps_patch() {
        let name = hotfix_branch_name("hotfix/", "v", "v1.2.3").unwrap();
        assert_eq!(name, "hotfix/1.2.4");
    }

    #[test]
    fn test_hotfix_branch_name_bare_tag() {
        let name = hotfix_branch_name("hotfix/", "v", "1.0.0").unwrap();
        assert_eq!(name, "hotfix/1.0.1");
    }

    #[test]
    fn test_hotfix_branch_name_unparsable_tag() {
        assert!(hotfix_branch_name("hotfix/", "v", "nightly").is_err());
    }

    #[test]
    fn test_rollback_branch_name_embeds_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 16, 20, 9).unwrap();
        assert_eq!(
            rollback_branch_name("v1.0.0", at),
            "rollback-to-v1.0.0-20240305162009"
        );
    }

    #[test]
    fn test_named_branch() {
        assert_eq!(named_branch("feature/", "login"), "feature/login");
    }
}
