use crate::domain::commit::CommitMeta;
use crate::domain::version::Version;
use crate::domain::CommitKind;
use crate::git::CommitRecord;
use std::fmt::Write;

/// Build the markdown release notes for a version.
///
/// With conventional-commit enforcement on, commits are grouped by type:
/// `## Features` (feat) first, `## Bug Fixes` (fix) second, then one
/// `## Other Changes` section covering every remaining classified type in
/// first-seen order, and a trailing `## Other` section for unclassified
/// commits. Empty sections are omitted. With enforcement off, all commits
/// are listed chronologically under a single `## Changes` section.
///
/// Every bullet is `- {subject} ({hash})`; entries in `## Other Changes`
/// additionally carry a `**type:** ` label prefix.
pub fn build_release_notes(
    version: &Version,
    commits: &[CommitRecord],
    enforce_conventional: bool,
) -> String {
    let mut notes = format!("# Release {}\n", version);

    if !enforce_conventional {
        notes.push_str("\n## Changes\n");
        for commit in commits {
            let _ = writeln!(notes, "- {} ({})", commit.subject, commit.hash);
        }
        return notes;
    }

    let mut features: Vec<&CommitRecord> = Vec::new();
    let mut fixes: Vec<&CommitRecord> = Vec::new();
    // Remaining classified kinds, grouped in first-seen order
    let mut other_changes: Vec<(CommitKind, Vec<&CommitRecord>)> = Vec::new();
    let mut unclassified: Vec<&CommitRecord> = Vec::new();

    for commit in commits {
        match CommitMeta::classify(&commit.subject) {
            Some(meta) if meta.kind == CommitKind::Feat => features.push(commit),
            Some(meta) if meta.kind == CommitKind::Fix => fixes.push(commit),
            Some(meta) => {
                if let Some((_, group)) =
                    other_changes.iter_mut().find(|(kind, _)| *kind == meta.kind)
                {
                    group.push(commit);
                } else {
                    other_changes.push((meta.kind, vec![commit]));
                }
            }
            None => unclassified.push(commit),
        }
    }

    if !features.is_empty() {
        notes.push_str("\n## Features\n");
        for commit in &features {
            let _ = writeln!(notes, "- {} ({})", commit.subject, commit.hash);
        }
    }

    if !fixes.is_empty() {
        notes.push_str("\n## Bug Fixes\n");
        for commit in &fixes {
            let _ = writeln!(notes, "- {} ({})", commit.subject, commit.hash);
        }
    }

    if !other_changes.is_empty() {
        notes.push_str("\n## Other Changes\n");
        for (kind, group) in &other_changes {
            for commit in group {
                let _ = writeln!(notes, "- **{}:** {} ({})", kind, commit.subject, commit.hash);
            }
        }
    }

    if !unclassified.is_empty() {
        notes.push_str("\n## Other\n");
        for commit in &unclassified {
            let _ = writeln!(notes, "- {} ({})", commit.subject, commit.hash);
        }
    }

    notes
}
