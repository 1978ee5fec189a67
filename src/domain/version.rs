use std::fmt;

/// Semantic version representation.
///
/// Holds the three numeric components plus the optional prerelease and
/// build-metadata segments. Instances are immutable: bumping always
/// produces a new value with prerelease and build metadata cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: String,
    pub buildmetadata: String,
}

/// Version bump category decided from commit analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpCategory {
    Major,
    Minor,
    Patch,
}

impl Version {
    /// Create a new version with empty prerelease and build metadata
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            prerelease: String::new(),
            buildmetadata: String::new(),
        }
    }

    /// Parse a version string against the canonical semver grammar.
    ///
    /// Total function: any non-conforming input yields `None` rather than
    /// an error. Accepts `MAJOR.MINOR.PATCH[-PRERELEASE][+BUILD]` exactly
    /// as the semver spec defines it (no `v` prefix, no loose forms).
    pub fn parse(text: &str) -> Option<Self> {
        let parsed = semver::Version::parse(text).ok()?;
        Some(Version {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            prerelease: parsed.pre.as_str().to_string(),
            buildmetadata: parsed.build.as_str().to_string(),
        })
    }

    /// Bump version according to the category.
    ///
    /// Major resets minor and patch, minor resets patch, patch only
    /// increments patch. Prerelease and build metadata are cleared in
    /// every case.
    pub fn bump(&self, category: BumpCategory) -> Self {
        match category {
            BumpCategory::Major => Version::new(self.major + 1, 0, 0),
            BumpCategory::Minor => Version::new(self.major, self.minor + 1, 0),
            BumpCategory::Patch => Version::new(self.major, self.minor, self.patch + 1),
        }
    }
}

/// Parse `text` and bump it in one step.
///
/// Returns `None` when the text is not a valid semantic version.
pub fn bump_text(category: BumpCategory, text: &str) -> Option<Version> {
    Version::parse(text).map(|v| v.bump(category))
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.prerelease.is_empty() {
            write!(f, "-{}", self.prerelease)?;
        }
        if !self.buildmetadata.is_empty() {
            write!(f, "+{}", self.buildmetadata)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 3);
        assert!(v.prerelease.is_empty());
        assert!(v.buildmetadata.is_empty());
    }

    #[test]
    fn test_version_parse_prerelease_and_build() {
        let v = Version::parse("1.2.3-beta.1+build.42").unwrap();
        assert_eq!(v.prerelease, "beta.1");
        assert_eq!(v.buildmetadata, "build.42");
    }

    #[test]
    fn test_version_parse_invalid() {
        assert_eq!(Version::parse("1.2"), None);
        assert_eq!(Version::parse("1.2.3.4"), None);
        assert_eq!(Version::parse("v1.2.3"), None);
        assert_eq!(Version::parse("not a version"), None);
        assert_eq!(Version::parse(""), None);
    }

    #[test]
    fn test_version_display_roundtrip() {
        for text in ["0.1.0", "1.2.3", "1.2.3-rc.1", "1.2.3+abc", "1.2.3-rc.1+abc"] {
            let v = Version::parse(text).unwrap();
            assert_eq!(v.to_string(), text);
            assert_eq!(Version::parse(&v.to_string()).unwrap(), v);
        }
    }

    #[test]
    fn test_version_bump_major() {
        let v = Version::parse("1.2.3-beta+exp").unwrap();
        let bumped = v.bump(BumpCategory::Major);
        assert_eq!(bumped, Version::new(2, 0, 0));
        assert!(bumped.prerelease.is_empty());
        assert!(bumped.buildmetadata.is_empty());
    }

    #[test]
    fn test_version_bump_minor() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(BumpCategory::Minor), Version::new(1, 3, 0));
    }

    #[test]
    fn test_version_bump_patch() {
        let v = Version::parse("1.2.3-rc.2").unwrap();
        let bumped = v.bump(BumpCategory::Patch);
        assert_eq!(bumped, Version::new(1, 2, 4));
        assert_eq!(bumped.patch, v.patch + 1);
        assert!(bumped.prerelease.is_empty());
    }

    #[test]
    fn test_bump_text() {
        assert_eq!(
            bump_text(BumpCategory::Patch, "1.2.3"),
            Some(Version::new(1, 2, 4))
        );
        assert_eq!(bump_text(BumpCategory::Patch, "garbage"), None);
    }
}
