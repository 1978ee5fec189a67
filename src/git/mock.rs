use crate::error::{GitReleaseError, Result};
use crate::git::{CommitRecord, Repository};
use chrono::{TimeZone, Utc};
use std::sync::Mutex;

/// Mock repository for testing without actual git operations.
///
/// Read facts are configured up front; write operations are recorded so
/// tests can assert on them. Push failures can be simulated to exercise
/// the partially-finalized release path.
pub struct MockRepository {
    branch: String,
    head: String,
    tags: Vec<String>,
    commits: Vec<CommitRecord>,
    clean: bool,
    fail_push: bool,
    created_branches: Mutex<Vec<String>>,
    created_tags: Mutex<Vec<String>>,
    pushed: Mutex<Vec<String>>,
    resets: Mutex<Vec<String>>,
}

impl MockRepository {
    /// Create a clean mock repository on `main` with no history
    pub fn new() -> Self {
        MockRepository {
            branch: "main".to_string(),
            head: "abcdef1234567890abcdef1234567890abcdef12".to_string(),
            tags: Vec::new(),
            commits: Vec::new(),
            clean: true,
            fail_push: false,
            created_branches: Mutex::new(Vec::new()),
            created_tags: Mutex::new(Vec::new()),
            pushed: Mutex::new(Vec::new()),
            resets: Mutex::new(Vec::new()),
        }
    }

    /// Set the currently checked-out branch
    pub fn set_branch(&mut self, name: impl Into<String>) {
        self.branch = name.into();
    }

    /// Add a tag; the most recently added tag is the latest
    pub fn add_tag(&mut self, name: impl Into<String>) {
        self.tags.push(name.into());
    }

    /// Add a commit since the latest tag (chronological order)
    pub fn add_commit(&mut self, hash: &str, subject: &str) {
        self.commits.push(CommitRecord {
            hash: hash.to_string(),
            subject: subject.to_string(),
            author: "Test Author".to_string(),
            date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        });
    }

    /// Mark the working tree dirty
    pub fn set_dirty(&mut self) {
        self.clean = false;
    }

    /// Make every push operation fail
    pub fn fail_pushes(&mut self) {
        self.fail_push = true;
    }

    /// Branches created through [Repository::create_branch]
    pub fn created_branches(&self) -> Vec<String> {
        self.created_branches.lock().unwrap().clone()
    }

    /// Tags created through [Repository::create_annotated_tag]
    pub fn created_tags(&self) -> Vec<String> {
        self.created_tags.lock().unwrap().clone()
    }

    /// Refs pushed through [Repository::push_branch] / [Repository::push_tag]
    pub fn pushed_refs(&self) -> Vec<String> {
        self.pushed.lock().unwrap().clone()
    }

    /// References passed to [Repository::hard_reset]
    pub fn reset_targets(&self) -> Vec<String> {
        self.resets.lock().unwrap().clone()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn current_branch(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn head_commit_id(&self) -> Result<String> {
        Ok(self.head.clone())
    }

    fn latest_tag(&self) -> Result<Option<String>> {
        Ok(self.tags.last().cloned())
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let mut tags = self.tags.clone();
        tags.sort();
        Ok(tags)
    }

    fn commits_since(&self, _tag: Option<&str>) -> Result<Vec<CommitRecord>> {
        Ok(self.commits.clone())
    }

    fn is_working_tree_clean(&self) -> Result<bool> {
        Ok(self.clean)
    }

    fn create_branch(&self, name: &str) -> Result<()> {
        self.created_branches.lock().unwrap().push(name.to_string());
        Ok(())
    }

    fn create_annotated_tag(&self, name: &str, _message: &str) -> Result<()> {
        self.created_tags.lock().unwrap().push(name.to_string());
        Ok(())
    }

    fn hard_reset(&self, reference: &str) -> Result<()> {
        self.resets.lock().unwrap().push(reference.to_string());
        Ok(())
    }

    fn push_branch(&self, remote: &str, branch: &str) -> Result<()> {
        if self.fail_push {
            return Err(GitReleaseError::remote(format!(
                "Simulated push failure for '{}'",
                branch
            )));
        }
        self.pushed
            .lock()
            .unwrap()
            .push(format!("{}/{}", remote, branch));
        Ok(())
    }

    fn push_tag(&self, remote: &str, tag: &str) -> Result<()> {
        if self.fail_push {
            return Err(GitReleaseError::remote(format!(
                "Simulated push failure for '{}'",
                tag
            )));
        }
        self.pushed
            .lock()
            .unwrap()
            .push(format!("{}/{}", remote, tag));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_basic() {
        let mut repo = MockRepository::new();
        repo.set_branch("develop");
        repo.add_commit("abc1234", "feat: something");

        assert_eq!(repo.current_branch().unwrap(), "develop");
        assert_eq!(repo.commits_since(None).unwrap().len(), 1);
        assert!(repo.is_working_tree_clean().unwrap());
    }

    #[test]
    fn test_mock_repository_tags() {
        let mut repo = MockRepository::new();
        repo.add_tag("v1.0.0");
        repo.add_tag("v1.1.0");

        assert_eq!(repo.latest_tag().unwrap(), Some("v1.1.0".to_string()));
        assert!(repo.tag_exists("v1.0.0").unwrap());
        assert!(!repo.tag_exists("v2.0.0").unwrap());
    }

    #[test]
    fn test_mock_repository_records_writes() {
        let repo = MockRepository::new();
        repo.create_branch("release/1.0.0").unwrap();
        repo.create_annotated_tag("v1.0.0", "Release 1.0.0").unwrap();
        repo.push_tag("origin", "v1.0.0").unwrap();
        repo.hard_reset("v0.9.0").unwrap();

        assert_eq!(repo.created_branches(), vec!["release/1.0.0"]);
        assert_eq!(repo.created_tags(), vec!["v1.0.0"]);
        assert_eq!(repo.pushed_refs(), vec!["origin/v1.0.0"]);
        assert_eq!(repo.reset_targets(), vec!["v0.9.0"]);
    }

    #[test]
    fn test_mock_repository_push_failure() {
        let mut repo = MockRepository::new();
        repo.fail_pushes();
        assert!(repo.push_tag("origin", "v1.0.0").is_err());
        assert!(repo.pushed_refs().is_empty());
    }
}
