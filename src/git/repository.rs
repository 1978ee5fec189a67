use crate::error::{GitReleaseError, Result};
use crate::git::{CommitRecord, Repository};
use chrono::{TimeZone, Utc};
use git2::build::CheckoutBuilder;
use std::collections::HashMap;
use std::path::Path;

/// Real [Repository] implementation backed by the `git2` crate.
///
/// Supports SSH authentication via keys from `~/.ssh/` or the SSH agent
/// for push operations.
pub struct Git2Repository {
    repo: git2::Repository,
}

impl Git2Repository {
    /// Discover the git repository in the current directory or its parents
    pub fn discover() -> Result<Self> {
        let repo = git2::Repository::discover(".").map_err(|e| {
            GitReleaseError::config(format!("Not in a git repository: {}", e))
        })?;
        Ok(Git2Repository { repo })
    }

    /// Open the git repository at a specific path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let repo = git2::Repository::open(path)?;
        Ok(Git2Repository { repo })
    }

    fn head_commit(&self) -> Result<git2::Commit<'_>> {
        Ok(self.repo.head()?.peel_to_commit()?)
    }

    /// Map all tags to the commit OID they point at.
    ///
    /// Annotated tags are peeled to their target commit so both tag kinds
    /// resolve to commits reachable by a revwalk.
    fn tag_commit_oids(&self) -> Result<HashMap<git2::Oid, String>> {
        let mut tag_oids = HashMap::new();
        let tags = self.repo.tag_names(None)?;

        for tag_name in tags.iter().flatten() {
            if let Ok(tag_ref) = self.repo.find_reference(&format!("refs/tags/{}", tag_name)) {
                if let Ok(commit) = tag_ref.peel(git2::ObjectType::Commit) {
                    tag_oids.insert(commit.id(), tag_name.to_string());
                }
            }
        }

        Ok(tag_oids)
    }

    fn record_from(commit: &git2::Commit<'_>) -> CommitRecord {
        let full_hash = commit.id().to_string();
        CommitRecord {
            hash: full_hash[..7].to_string(),
            subject: commit.summary().unwrap_or("").to_string(),
            author: commit.author().name().unwrap_or("").to_string(),
            date: Utc
                .timestamp_opt(commit.time().seconds(), 0)
                .single()
                .unwrap_or_default(),
        }
    }

    fn push_refspec(&self, remote_name: &str, refspec: &str) -> Result<()> {
        let mut remote = self.repo.find_remote(remote_name).map_err(|_| {
            GitReleaseError::remote(format!("No remote named '{}' found", remote_name))
        })?;

        let mut push_options = git2::PushOptions::new();

        // Set credentials callback for authentication
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                // Try different key types in order of preference
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                let key_paths = vec![
                    format!("{}/.ssh/id_ed25519", home),
                    format!("{}/.ssh/id_rsa", home),
                    format!("{}/.ssh/id_ecdsa", home),
                ];

                for key_path in key_paths {
                    let path = Path::new(&key_path);
                    if path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(
                            username_from_url.unwrap_or("git"),
                            None,
                            path,
                            None,
                        ) {
                            return Ok(cred);
                        }
                    }
                }

                // Try SSH agent as fallback
                if let Ok(cred) =
                    git2::Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
                {
                    return Ok(cred);
                }
            }

            git2::Cred::default()
        });

        // Catch per-reference rejections during push
        callbacks.push_update_reference(|refname, status| {
            if let Some(status) = status {
                Err(git2::Error::from_str(&format!(
                    "Push rejected for {}: {}",
                    refname, status
                )))
            } else {
                Ok(())
            }
        });

        push_options.remote_callbacks(callbacks);

        remote
            .push(&[refspec], Some(&mut push_options))
            .map_err(|e| {
                if e.class() == git2::ErrorClass::Net {
                    GitReleaseError::remote(format!("Network error during push: {}", e))
                } else {
                    GitReleaseError::remote(format!("Failed to push '{}': {}", refspec, e))
                }
            })
    }
}

impl Repository for Git2Repository {
    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        let name = head
            .shorthand()
            .ok_or_else(|| GitReleaseError::branch("HEAD is not on a named branch"))?;
        Ok(name.to_string())
    }

    fn head_commit_id(&self) -> Result<String> {
        let head = self.repo.head()?;
        let oid = head
            .target()
            .ok_or_else(|| GitReleaseError::branch("HEAD is detached or invalid"))?;
        Ok(oid.to_string())
    }

    fn latest_tag(&self) -> Result<Option<String>> {
        let head_oid = self.head_commit()?.id();

        // Walk the commit history backwards to find the most recent tag
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(head_oid)?;

        let tag_oids = self.tag_commit_oids()?;

        for oid in revwalk {
            match oid {
                Ok(oid) => {
                    if let Some(tag_name) = tag_oids.get(&oid) {
                        return Ok(Some(tag_name.clone()));
                    }
                }
                Err(_) => continue,
            }
        }

        Ok(None)
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;
        let mut names: Vec<String> = tags.iter().flatten().map(|t| t.to_string()).collect();
        names.sort();
        Ok(names)
    }

    fn commits_since(&self, tag: Option<&str>) -> Result<Vec<CommitRecord>> {
        let head_oid = self.head_commit()?.id();

        // Walk commits from HEAD backwards until the tag commit
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(head_oid)?;

        let tag_oid = tag.and_then(|tag_name| {
            self.repo
                .find_reference(&format!("refs/tags/{}", tag_name))
                .ok()
                .and_then(|r| r.peel(git2::ObjectType::Commit).ok())
                .map(|obj| obj.id())
        });

        let mut commits = Vec::new();
        for oid in revwalk {
            let oid = oid?;

            // Stop if we reached the tag commit
            if Some(oid) == tag_oid {
                break;
            }

            if let Ok(commit) = self.repo.find_commit(oid) {
                commits.push(Self::record_from(&commit));
            }
        }

        // Reverse to get chronological order (oldest first)
        commits.reverse();
        Ok(commits)
    }

    fn is_working_tree_clean(&self) -> Result<bool> {
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(true).include_ignored(false);
        let statuses = self.repo.statuses(Some(&mut opts))?;
        Ok(statuses.is_empty())
    }

    fn create_branch(&self, name: &str) -> Result<()> {
        let head = self.head_commit()?;
        self.repo.branch(name, &head, false)?;
        self.repo.set_head(&format!("refs/heads/{}", name))?;

        let mut checkout = CheckoutBuilder::new();
        checkout.safe();
        self.repo.checkout_head(Some(&mut checkout))?;
        Ok(())
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        let head = self.head_commit()?;
        let signature = self.repo.signature()?;
        self.repo
            .tag(name, head.as_object(), &signature, message, false)?;
        Ok(())
    }

    fn hard_reset(&self, reference: &str) -> Result<()> {
        let target = self.repo.revparse_single(reference).map_err(|_| {
            GitReleaseError::tag(format!("Reference '{}' not found", reference))
        })?;

        let mut checkout = CheckoutBuilder::new();
        checkout.force();
        self.repo
            .reset(&target, git2::ResetType::Hard, Some(&mut checkout))?;
        Ok(())
    }

    fn push_branch(&self, remote: &str, branch: &str) -> Result<()> {
        self.push_refspec(remote, &format!("refs/heads/{}", branch))
    }

    fn push_tag(&self, remote: &str, tag: &str) -> Result<()> {
        self.push_refspec(remote, &format!("refs/tags/{}", tag))
    }
}
