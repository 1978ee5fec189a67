//! Release workflow orchestration
//!
//! Implements the two-step release lifecycle (prepare, then finalize) and
//! the hotfix/rollback/named-branch workflows on top of the [Repository]
//! abstraction. All functions here are callable programmatically; the CLI
//! shell in `main.rs` only parses arguments and prints results.

use crate::analyzer::{build_release_notes, VersionAnalyzer};
use crate::config::ReleaseConfig;
use crate::domain::branch::{
    hotfix_branch_name, named_branch, release_branch_name, rollback_branch_name,
};
use crate::domain::snapshot::{build_snapshot, VcsFacts};
use crate::domain::tag::release_tag_name;
use crate::domain::{BranchKind, ReleaseSnapshot, Version};
use crate::error::{GitReleaseError, Result};
use crate::git::Repository;
use crate::manifest::DependencyEntry;
use crate::verify::{CheckProvider, Verifier};
use chrono::{DateTime, Utc};

/// A release that has been prepared: branch created, tag name computed,
/// nothing tagged or pushed yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRelease {
    pub version: Version,
    pub branch: String,
    pub tag: String,
}

/// A finalized release.
///
/// The tag is created before anything is pushed, so on a push failure the
/// tag name and notes are still carried here for the operator to retry
/// the push manually.
#[derive(Debug, Clone)]
pub struct FinalizedRelease {
    pub version: Version,
    pub branch: String,
    pub tag: String,
    pub notes: String,
    pub snapshot: ReleaseSnapshot,
    pub pushed: bool,
    pub push_error: Option<String>,
}

/// A started hotfix branch
#[derive(Debug, Clone, PartialEq)]
pub struct HotfixStarted {
    pub branch: String,
    pub base_tag: String,
}

/// Prepare the next release.
///
/// Gates on a clean working tree when the policy requires it, suggests
/// the next version from the commit history, creates the release branch,
/// and computes the tag name without creating the tag.
pub fn prepare_release<R: Repository>(
    repo: &R,
    config: &ReleaseConfig,
) -> Result<PreparedRelease> {
    if config.policy.require_clean_work_dir && !repo.is_working_tree_clean()? {
        return Err(GitReleaseError::verification(
            "Working tree has uncommitted changes; commit or stash them before preparing a release",
        ));
    }

    let latest_tag = repo.latest_tag()?;
    let commits = repo.commits_since(latest_tag.as_deref())?;

    let analyzer = VersionAnalyzer::new(config.clone());
    let version = analyzer.suggest_next_version(latest_tag.as_deref(), &commits)?;

    let branch = release_branch_name(&config.branches.release, &version);
    let tag = release_tag_name(&config.tag_prefix, &version);

    repo.create_branch(&branch)?;

    Ok(PreparedRelease {
        version,
        branch,
        tag,
    })
}

/// Finalize the release prepared on the current branch.
///
/// Requires HEAD to be on a release branch (the version is recovered from
/// the branch name) and the full verification to pass. Creates the
/// annotated tag, builds notes and the snapshot, then pushes branch and
/// tag. A push failure after the tag exists does not discard the computed
/// artifacts: the result carries them together with the error, and
/// nothing is rolled back automatically.
///
/// With `dry_run` set, everything is computed and verified but no tag is
/// created and nothing is pushed.
pub fn finalize_release<R: Repository, P: CheckProvider>(
    repo: &R,
    checks: &P,
    config: &ReleaseConfig,
    dependencies: Vec<DependencyEntry>,
    now: DateTime<Utc>,
    dry_run: bool,
) -> Result<FinalizedRelease> {
    let branch = repo.current_branch()?;
    let version_text = branch.strip_prefix(&config.branches.release).ok_or_else(|| {
        GitReleaseError::branch(format!(
            "Current branch '{}' is not a release branch (expected prefix '{}')",
            branch, config.branches.release
        ))
    })?;

    let version = Version::parse(version_text).ok_or_else(|| {
        GitReleaseError::version(format!(
            "Cannot recover a version from branch '{}'",
            branch
        ))
    })?;

    let verification = Verifier::new(repo, checks, config).run()?;
    if !verification.overall() {
        return Err(GitReleaseError::verification(
            verification.messages.join("; "),
        ));
    }

    let previous_tag = repo.latest_tag()?;
    let commits = repo.commits_since(previous_tag.as_deref())?;

    let notes = build_release_notes(
        &version,
        &commits,
        config.policy.enforce_conventional_commits,
    );

    let tag = release_tag_name(&config.tag_prefix, &version);
    if repo.tag_exists(&tag)? {
        return Err(GitReleaseError::tag(format!(
            "Tag '{}' already exists",
            tag
        )));
    }

    let snapshot = build_snapshot(
        &version.to_string(),
        now,
        VcsFacts {
            commit_id: repo.head_commit_id()?,
            branch: branch.clone(),
            tag: tag.clone(),
            previous_tag: previous_tag.clone(),
        },
        config,
        &commits,
        dependencies,
    );

    if dry_run {
        return Ok(FinalizedRelease {
            version,
            branch,
            tag,
            notes,
            snapshot,
            pushed: false,
            push_error: None,
        });
    }

    repo.create_annotated_tag(&tag, &format!("Release {}", version))?;

    // The tag exists from here on; push failures must still surface the
    // computed artifacts so the operator can push manually.
    let push_result = repo
        .push_branch(&config.remote, &branch)
        .and_then(|_| repo.push_tag(&config.remote, &tag));

    let (pushed, push_error) = match push_result {
        Ok(()) => (true, None),
        Err(e) => (false, Some(e.to_string())),
    };

    Ok(FinalizedRelease {
        version,
        branch,
        tag,
        notes,
        snapshot,
        pushed,
        push_error,
    })
}

/// Start a hotfix branch from a base tag.
///
/// Without an explicit base tag the latest tag is used. The tag prefix is
/// stripped, the version patch-bumped, and the hotfix branch created.
pub fn start_hotfix<R: Repository>(
    repo: &R,
    config: &ReleaseConfig,
    base_tag: Option<&str>,
) -> Result<HotfixStarted> {
    let base_tag = match base_tag {
        Some(tag) => {
            if !repo.tag_exists(tag)? {
                return Err(GitReleaseError::tag(format!("Tag '{}' not found", tag)));
            }
            tag.to_string()
        }
        None => repo.latest_tag()?.ok_or_else(|| {
            GitReleaseError::tag("No tag found to base the hotfix on")
        })?,
    };

    let branch = hotfix_branch_name(&config.branches.hotfix, &config.tag_prefix, &base_tag)?;
    repo.create_branch(&branch)?;

    Ok(HotfixStarted { branch, base_tag })
}

/// Roll the working tree back to a tag on a fresh branch.
///
/// Creates a uniquely named `rollback-to-{tag}-{timestamp}` branch and
/// hard-resets it to the tag. The current branch is left untouched.
pub fn rollback_to<R: Repository>(
    repo: &R,
    tag: &str,
    now: DateTime<Utc>,
) -> Result<String> {
    if !repo.tag_exists(tag)? {
        return Err(GitReleaseError::tag(format!("Tag '{}' not found", tag)));
    }

    let branch = rollback_branch_name(tag, now);
    repo.create_branch(&branch)?;
    repo.hard_reset(tag)?;

    Ok(branch)
}

/// Create a generic named branch for a branch kind (feature, hotfix,
/// release), using the configured prefix.
pub fn create_branch_of_kind<R: Repository>(
    repo: &R,
    config: &ReleaseConfig,
    kind: BranchKind,
    name: &str,
) -> Result<String> {
    let branch = named_branch(config.branches.prefix_for(kind), name);
    repo.create_branch(&branch)?;
    Ok(branch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;
    use crate::verify::SimulatedChecks;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 16, 20, 9).unwrap()
    }

    #[test]
    fn test_prepare_release_creates_branch_and_tag_name() {
        let mut repo = MockRepository::new();
        repo.add_tag("v1.2.3");
        repo.add_commit("h1", "feat: add export");
        let config = ReleaseConfig::default();

        let prepared = prepare_release(&repo, &config).unwrap();

        assert_eq!(prepared.version.to_string(), "1.3.0");
        assert_eq!(prepared.branch, "release/1.3.0");
        assert_eq!(prepared.tag, "v1.3.0");
        assert_eq!(repo.created_branches(), vec!["release/1.3.0"]);
        // Prepared, not finalized: no tag created yet
        assert!(repo.created_tags().is_empty());
    }

    #[test]
    fn test_prepare_release_requires_clean_tree() {
        let mut repo = MockRepository::new();
        repo.set_dirty();
        let config = ReleaseConfig::default();

        let result = prepare_release(&repo, &config);
        assert!(result.is_err());
        assert!(repo.created_branches().is_empty());
    }

    #[test]
    fn test_prepare_release_dirty_tree_allowed_when_disabled() {
        let mut repo = MockRepository::new();
        repo.set_dirty();
        let mut config = ReleaseConfig::default();
        config.policy.require_clean_work_dir = false;

        assert!(prepare_release(&repo, &config).is_ok());
    }

    #[test]
    fn test_prepare_release_without_history_uses_initial_version() {
        let repo = MockRepository::new();
        let config = ReleaseConfig::default();

        let prepared = prepare_release(&repo, &config).unwrap();
        assert_eq!(prepared.version.to_string(), "0.1.0");
    }

    #[test]
    fn test_finalize_release_happy_path() {
        let mut repo = MockRepository::new();
        repo.set_branch("release/1.3.0");
        repo.add_tag("v1.2.3");
        repo.add_commit("h1", "feat: add export");
        repo.add_commit("h2", "fix: null handling");
        let config = ReleaseConfig::default();

        let finalized =
            finalize_release(&repo, &SimulatedChecks, &config, vec![], now(), false).unwrap();

        assert_eq!(finalized.tag, "v1.3.0");
        assert!(finalized.pushed);
        assert!(finalized.push_error.is_none());
        assert!(finalized.notes.contains("# Release 1.3.0"));
        assert!(finalized.notes.contains("- feat: add export (h1)"));
        assert_eq!(finalized.snapshot.vcs.previous_tag.as_deref(), Some("v1.2.3"));
        assert_eq!(repo.created_tags(), vec!["v1.3.0"]);
        assert_eq!(
            repo.pushed_refs(),
            vec!["origin/release/1.3.0", "origin/v1.3.0"]
        );
    }

    #[test]
    fn test_finalize_release_requires_release_branch() {
        let repo = MockRepository::new();
        let config = ReleaseConfig::default();

        let result =
            finalize_release(&repo, &SimulatedChecks, &config, vec![], now(), false);
        assert!(result.is_err());
        assert!(repo.created_tags().is_empty());
    }

    #[test]
    fn test_finalize_release_blocked_by_verification() {
        let mut repo = MockRepository::new();
        repo.set_branch("release/1.3.0");
        repo.add_commit("h1", "not a conventional commit");
        let config = ReleaseConfig::default();

        let result =
            finalize_release(&repo, &SimulatedChecks, &config, vec![], now(), false);
        assert!(result.is_err());
        assert!(repo.created_tags().is_empty());
    }

    #[test]
    fn test_finalize_release_rejects_existing_tag() {
        let mut repo = MockRepository::new();
        repo.set_branch("release/1.2.3");
        repo.add_tag("v1.2.3");
        let config = ReleaseConfig::default();

        let result =
            finalize_release(&repo, &SimulatedChecks, &config, vec![], now(), false);
        assert!(matches!(result, Err(GitReleaseError::Tag(_))));
    }

    #[test]
    fn test_finalize_release_push_failure_surfaces_artifacts() {
        let mut repo = MockRepository::new();
        repo.set_branch("release/1.3.0");
        repo.add_tag("v1.2.3");
        repo.add_commit("h1", "feat: add export");
        repo.fail_pushes();
        let config = ReleaseConfig::default();

        let finalized =
            finalize_release(&repo, &SimulatedChecks, &config, vec![], now(), false).unwrap();

        // Tag was created even though the push failed
        assert_eq!(repo.created_tags(), vec!["v1.3.0"]);
        assert!(!finalized.pushed);
        assert!(finalized.push_error.is_some());
        assert_eq!(finalized.tag, "v1.3.0");
        assert!(finalized.notes.contains("# Release 1.3.0"));
    }

    #[test]
    fn test_finalize_release_dry_run_mutates_nothing() {
        let mut repo = MockRepository::new();
        repo.set_branch("release/1.3.0");
        repo.add_tag("v1.2.3");
        repo.add_commit("h1", "feat: add export");
        let config = ReleaseConfig::default();

        let finalized =
            finalize_release(&repo, &SimulatedChecks, &config, vec![], now(), true).unwrap();

        assert_eq!(finalized.tag, "v1.3.0");
        assert!(repo.created_tags().is_empty());
        assert!(repo.pushed_refs().is_empty());
    }

    #[test]
    fn test_start_hotfix_from_latest_tag() {
        let mut repo = MockRepository::new();
        repo.add_tag("v1.2.3");
        let config = ReleaseConfig::default();

        let hotfix = start_hotfix(&repo, &config, None).unwrap();

        assert_eq!(hotfix.base_tag, "v1.2.3");
        assert_eq!(hotfix.branch, "hotfix/1.2.4");
        assert_eq!(repo.created_branches(), vec!["hotfix/1.2.4"]);
    }

    #[test]
    fn test_start_hotfix_from_explicit_tag() {
        let mut repo = MockRepository::new();
        repo.add_tag("v1.1.0");
        repo.add_tag("v1.2.3");
        let config = ReleaseConfig::default();

        let hotfix = start_hotfix(&repo, &config, Some("v1.1.0")).unwrap();
        assert_eq!(hotfix.branch, "hotfix/1.1.1");
    }

    #[test]
    fn test_start_hotfix_unknown_tag() {
        let repo = MockRepository::new();
        let config = ReleaseConfig::default();

        assert!(start_hotfix(&repo, &config, Some("v9.9.9")).is_err());
    }

    #[test]
    fn test_start_hotfix_without_any_tag() {
        let repo = MockRepository::new();
        let config = ReleaseConfig::default();

        assert!(start_hotfix(&repo, &config, None).is_err());
    }

    #[test]
    fn test_rollback_creates_branch_and_resets() {
        let mut repo = MockRepository::new();
        repo.add_tag("v1.0.0");

        let branch = rollback_to(&repo, "v1.0.0", now()).unwrap();

        assert_eq!(branch, "rollback-to-v1.0.0-20240305162009");
        assert_eq!(repo.created_branches(), vec![branch.clone()]);
        assert_eq!(repo.reset_targets(), vec!["v1.0.0"]);
    }

    #[test]
    fn test_rollback_unknown_tag() {
        let repo = MockRepository::new();
        let result = rollback_to(&repo, "v1.0.0", now());
        assert!(result.is_err());
        assert!(repo.reset_targets().is_empty());
    }

    #[test]
    fn test_create_branch_of_kind() {
        let repo = MockRepository::new();
        let config = ReleaseConfig::default();

        let branch =
            create_branch_of_kind(&repo, &config, BranchKind::Feature, "login").unwrap();
        assert_eq!(branch, "feature/login");
        assert_eq!(repo.created_branches(), vec!["feature/login"]);
    }
}
