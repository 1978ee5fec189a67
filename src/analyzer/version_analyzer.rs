use crate::config::ReleaseConfig;
use crate::domain::commit::CommitMeta;
use crate::domain::tag::version_from_tag;
use crate::domain::version::{BumpCategory, Version};
use crate::domain::CommitKind;
use crate::error::{GitReleaseError, Result};
use crate::git::CommitRecord;

/// Analyzes commits to determine the next version
pub struct VersionAnalyzer {
    config: ReleaseConfig,
}

impl VersionAnalyzer {
    /// Create a new version analyzer
    pub fn new(config: ReleaseConfig) -> Self {
        VersionAnalyzer { config }
    }

    /// Fold a commit list into the single required bump category.
    ///
    /// Unclassified commits never block the decision: they are discarded.
    /// Any breaking classified commit forces a major bump, otherwise any
    /// `feat` commit a minor bump, otherwise patch. An empty commit list
    /// (or one with no classifiable commit) yields patch.
    pub fn bump_for(&self, commits: &[CommitRecord]) -> BumpCategory {
        let mut has_features = false;

        for commit in commits {
            if let Some(meta) = CommitMeta::classify(&commit.subject) {
                // Breaking changes have highest priority, return early
                if meta.breaking {
                    return BumpCategory::Major;
                }

                if meta.kind == CommitKind::Feat {
                    has_features = true;
                }
            }
        }

        if has_features {
            BumpCategory::Minor
        } else {
            BumpCategory::Patch
        }
    }

    /// Suggest the next version from the latest tag and the commits since.
    ///
    /// With no previous tag the configured initial version is used. With a
    /// tag, the configured prefix is stripped and the recovered version is
    /// bumped by the classified category; when conventional-commit
    /// enforcement is disabled or there are no commits, the bump defaults
    /// to patch. A tag whose remainder is not a semantic version is a
    /// version error the caller decides how to recover from.
    pub fn suggest_next_version(
        &self,
        latest_tag: Option<&str>,
        commits: &[CommitRecord],
    ) -> Result<Version> {
        let tag = match latest_tag {
            Some(tag) => tag,
            None => {
                return Version::parse(&self.config.initial_version).ok_or_else(|| {
                    GitReleaseError::config(format!(
                        "Configured initial_version '{}' is not a valid semantic version",
                        self.config.initial_version
                    ))
                });
            }
        };

        let current = version_from_tag(tag, &self.config.tag_prefix).ok_or_else(|| {
            GitReleaseError::version(format!("Cannot parse version from tag '{}'", tag))
        })?;

        let category = if self.config.policy.enforce_conventional_commits && !commits.is_empty() {
            self.bump_for(commits)
        } else {
            BumpCategory::Patch
        };

        Ok(current.bump(category))
    }
}
