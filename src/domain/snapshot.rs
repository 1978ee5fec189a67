use crate::config::ReleaseConfig;
use crate::git::CommitRecord;
use crate::manifest::DependencyEntry;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Repository facts captured at finalize time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VcsFacts {
    pub commit_id: String,
    pub branch: String,
    pub tag: String,
    pub previous_tag: Option<String>,
}

/// Immutable point-in-time record of a release.
///
/// Created once when a release is finalized and never mutated afterwards.
/// The caller persists it (pretty-printed JSON artifact).
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseSnapshot {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub vcs: VcsFacts,
    pub config: ReleaseConfig,
    pub commits: Vec<CommitRecord>,
    pub dependencies: Vec<DependencyEntry>,
}

/// Aggregate release facts into a snapshot. Pure: no side effects, the
/// clock is injected by the caller.
pub fn build_snapshot(
    version: &str,
    at: DateTime<Utc>,
    vcs: VcsFacts,
    config: &ReleaseConfig,
    commits: &[CommitRecord],
    dependencies: Vec<DependencyEntry>,
) -> ReleaseSnapshot {
    ReleaseSnapshot {
        version: version.to_string(),
        timestamp: at,
        vcs,
        config: config.clone(),
        commits: commits.to_vec(),
        dependencies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_commit() -> CommitRecord {
        CommitRecord {
            hash: "abc1234".to_string(),
            subject: "feat: add login".to_string(),
            author: "Test Author".to_string(),
            date: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    #[test]
    fn test_build_snapshot_copies_inputs() {
        let config = ReleaseConfig::default();
        let commits = vec![sample_commit()];
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

        let snapshot = build_snapshot(
            "1.2.0",
            at,
            VcsFacts {
                commit_id: "abc1234".to_string(),
                branch: "release/1.2.0".to_string(),
                tag: "v1.2.0".to_string(),
                previous_tag: Some("v1.1.0".to_string()),
            },
            &config,
            &commits,
            vec![],
        );

        assert_eq!(snapshot.version, "1.2.0");
        assert_eq!(snapshot.timestamp, at);
        assert_eq!(snapshot.vcs.tag, "v1.2.0");
        assert_eq!(snapshot.vcs.previous_tag.as_deref(), Some("v1.1.0"));
        assert_eq!(snapshot.commits.len(), 1);
        assert_eq!(snapshot.config.tag_prefix, config.tag_prefix);
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let config = ReleaseConfig::default();
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let snapshot = build_snapshot(
            "0.1.0",
            at,
            VcsFacts {
                commit_id: "deadbee".to_string(),
                branch: "release/0.1.0".to_string(),
                tag: "v0.1.0".to_string(),
                previous_tag: None,
            },
            &config,
            &[sample_commit()],
            vec![DependencyEntry {
                name: "serde".to_string(),
                version: "1.0".to_string(),
            }],
        );

        let json = serde_json::to_string_pretty(&snapshot).unwrap();
        assert!(json.contains("\"version\": \"0.1.0\""));
        assert!(json.contains("\"tag\": \"v0.1.0\""));
        assert!(json.contains("\"serde\""));
    }
}
