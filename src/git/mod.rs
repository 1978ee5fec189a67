//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over Git operations,
//! allowing for multiple implementations including real Git repositories
//! and mock implementations for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait, which defines the
//! read-only facts (branch, tags, commit history, working-tree state) and
//! write actions (branches, tags, reset, push) that git-release needs.
//! The concrete implementations include:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! # Usage
//!
//! Most code should depend on the [Repository] trait rather than concrete
//! implementations to enable easy testing and flexibility.
//!
//! ```rust
//! # use git_release::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> Result<(), Box<dyn std::error::Error>> {
//! let latest = repo.latest_tag()?;
//! let commits = repo.commits_since(latest.as_deref())?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Commit facts sourced from version-control history; never mutated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    /// The commit hash (shortened)
    pub hash: String,
    /// The commit subject line (first line of the message)
    pub subject: String,
    /// The commit author
    pub author: String,
    /// The author date
    pub date: DateTime<Utc>,
}

/// Common git operation trait for abstraction
///
/// This trait abstracts Git operations to allow for multiple implementations
/// including real Git repositories and mock implementations for testing.
///
/// ## Thread Safety
///
/// All implementors must be `Send` so ownership can move across threads.
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// underlying errors (like `git2::Error`) to the appropriate
/// [crate::error::GitReleaseError] variants. Write operations report
/// success or failure only; there is no partial-success detail.
pub trait Repository: Send {
    /// Get the name of the currently checked-out branch
    fn current_branch(&self) -> Result<String>;

    /// Get the full hash of the current HEAD commit
    fn head_commit_id(&self) -> Result<String>;

    /// Find the most recent tag reachable from HEAD
    ///
    /// Walks the commit history backwards from HEAD; handles both
    /// lightweight and annotated tags.
    ///
    /// # Returns
    /// * `Ok(Some(tag))` - The latest tag name found
    /// * `Ok(None)` - If no tag is reachable from HEAD
    fn latest_tag(&self) -> Result<Option<String>>;

    /// Get all tag names in the repository, sorted alphabetically
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Get all commits since a tag, in chronological order (oldest first)
    ///
    /// # Arguments
    /// * `tag` - Optional tag to stop at; if `None`, returns every commit
    ///   reachable from HEAD
    fn commits_since(&self, tag: Option<&str>) -> Result<Vec<CommitRecord>>;

    /// Check whether the working tree has no uncommitted changes
    fn is_working_tree_clean(&self) -> Result<bool>;

    /// Create a branch at HEAD and check it out
    fn create_branch(&self, name: &str) -> Result<()>;

    /// Create an annotated tag on the current HEAD commit
    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Hard-reset the working tree and HEAD to a reference (e.g. a tag)
    fn hard_reset(&self, reference: &str) -> Result<()>;

    /// Push a branch to a remote
    fn push_branch(&self, remote: &str, branch: &str) -> Result<()>;

    /// Push a tag to a remote
    fn push_tag(&self, remote: &str, tag: &str) -> Result<()>;

    /// Check whether a tag exists in the repository
    fn tag_exists(&self, name: &str) -> Result<bool> {
        Ok(self.list_tags()?.iter().any(|t| t == name))
    }
}
