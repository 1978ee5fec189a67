use crate::domain::BranchKind;
use crate::error::{GitReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name in the repository root
pub const CONFIG_FILE: &str = "gitrelease.toml";

/// Represents the complete configuration for git-release.
///
/// Contains versioning settings, the ordered workflow stage list, branch
/// prefixes, verification policy, and release artifact options. Every
/// field has a default so a partial file on disk merges under the
/// defaults.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default = "default_initial_version")]
    pub initial_version: String,

    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,

    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_stages")]
    pub stages: Vec<String>,

    #[serde(default)]
    pub branches: BranchesConfig,

    #[serde(default)]
    pub policy: PolicyConfig,

    #[serde(default)]
    pub artifacts: ArtifactsConfig,
}

fn default_initial_version() -> String {
    "0.1.0".to_string()
}

fn default_tag_prefix() -> String {
    "v".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Returns the default ordered workflow stage list.
fn default_stages() -> Vec<String> {
    vec![
        "development".to_string(),
        "testing".to_string(),
        "staging".to_string(),
        "production".to_string(),
    ]
}

/// Branch name prefixes per branch kind.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BranchesConfig {
    #[serde(default = "default_release_prefix")]
    pub release: String,

    #[serde(default = "default_hotfix_prefix")]
    pub hotfix: String,

    #[serde(default = "default_feature_prefix")]
    pub feature: String,
}

fn default_release_prefix() -> String {
    "release/".to_string()
}

fn default_hotfix_prefix() -> String {
    "hotfix/".to_string()
}

fn default_feature_prefix() -> String {
    "feature/".to_string()
}

impl BranchesConfig {
    /// Look up the configured prefix for a branch kind
    pub fn prefix_for(&self, kind: BranchKind) -> &str {
        match kind {
            BranchKind::Release => &self.release,
            BranchKind::Hotfix => &self.hotfix,
            BranchKind::Feature => &self.feature,
        }
    }
}

impl Default for BranchesConfig {
    fn default() -> Self {
        BranchesConfig {
            release: default_release_prefix(),
            hotfix: default_hotfix_prefix(),
            feature: default_feature_prefix(),
        }
    }
}

/// Verification policy controlling the pre-release checks.
///
/// Each flag toggles one check; a disabled check passes unconditionally.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PolicyConfig {
    #[serde(default = "default_true")]
    pub require_clean_work_dir: bool,

    #[serde(default = "default_true")]
    pub run_tests: bool,

    #[serde(default = "default_true")]
    pub enforce_conventional_commits: bool,

    #[serde(default = "default_ci_checks")]
    pub required_ci_checks: Vec<String>,
}

fn default_true() -> bool {
    true
}

/// Returns the default list of required CI check names.
fn default_ci_checks() -> Vec<String> {
    vec!["build".to_string(), "lint".to_string()]
}

impl Default for PolicyConfig {
    fn default() -> Self {
        PolicyConfig {
            require_clean_work_dir: true,
            run_tests: true,
            enforce_conventional_commits: true,
            required_ci_checks: default_ci_checks(),
        }
    }
}

/// Release artifact options for `release finalize`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ArtifactsConfig {
    #[serde(default = "default_true")]
    pub write_notes: bool,

    #[serde(default = "default_notes_file")]
    pub notes_file: String,

    #[serde(default = "default_true")]
    pub write_snapshot: bool,

    #[serde(default = "default_snapshot_file")]
    pub snapshot_file: String,
}

fn default_notes_file() -> String {
    "RELEASE_NOTES.md".to_string()
}

fn default_snapshot_file() -> String {
    "release-snapshot.json".to_string()
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        ArtifactsConfig {
            write_notes: true,
            notes_file: default_notes_file(),
            write_snapshot: true,
            snapshot_file: default_snapshot_file(),
        }
    }
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            initial_version: default_initial_version(),
            tag_prefix: default_tag_prefix(),
            remote: default_remote(),
            stages: default_stages(),
            branches: BranchesConfig::default(),
            policy: PolicyConfig::default(),
            artifacts: ArtifactsConfig::default(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitrelease.toml` in the current directory
/// 3. `.gitrelease.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// Missing fields in a stored file take their default values.
pub fn load_config(config_path: Option<&str>) -> Result<ReleaseConfig> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(CONFIG_FILE).exists() {
        fs::read_to_string(CONFIG_FILE)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".gitrelease.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(ReleaseConfig::default());
        }
    } else {
        return Ok(ReleaseConfig::default());
    };

    let config: ReleaseConfig = toml::from_str(&config_str)
        .map_err(|e| GitReleaseError::config(format!("Invalid configuration: {}", e)))?;
    Ok(config)
}

/// Write a configuration file.
pub fn save_config(config: &ReleaseConfig, path: &Path) -> Result<()> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| GitReleaseError::config(format!("Cannot serialize configuration: {}", e)))?;
    fs::write(path, rendered)?;
    Ok(())
}

/// Resolve the file a `config set` should rewrite.
///
/// An explicit path wins; otherwise the repository-local file is used,
/// whether or not it exists yet.
pub fn config_file_path(config_path: Option<&str>) -> PathBuf {
    match config_path {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(CONFIG_FILE),
    }
}

/// Update one configuration field by dotted path and rewrite the store.
///
/// The stored file is read (or the defaults are materialized if no file
/// exists), the single addressed field is replaced, the result is
/// validated against the schema, and the whole file is written back.
/// All other fields are preserved.
pub fn update_config_value(
    config_path: Option<&str>,
    dotted_path: &str,
    raw_value: &str,
) -> Result<ReleaseConfig> {
    let file = config_file_path(config_path);

    let mut table: toml::Table = if file.exists() {
        let text = fs::read_to_string(&file)?;
        text.parse()
            .map_err(|e| GitReleaseError::config(format!("Invalid configuration: {}", e)))?
    } else {
        let rendered = toml::to_string_pretty(&ReleaseConfig::default())
            .map_err(|e| GitReleaseError::config(format!("Cannot serialize defaults: {}", e)))?;
        rendered
            .parse()
            .map_err(|e| GitReleaseError::config(format!("Cannot parse defaults: {}", e)))?
    };

    set_dotted(&mut table, dotted_path, parse_toml_value(raw_value))?;

    // Validate the mutated document against the schema before rewriting
    let config: ReleaseConfig = toml::Value::Table(table.clone())
        .try_into()
        .map_err(|e| GitReleaseError::config(format!("Invalid value for '{}': {}", dotted_path, e)))?;

    let rendered = toml::to_string_pretty(&table)
        .map_err(|e| GitReleaseError::config(format!("Cannot serialize configuration: {}", e)))?;
    fs::write(&file, rendered)?;

    Ok(config)
}

/// Interpret a raw CLI value as a typed TOML value.
///
/// Booleans, numbers, and arrays parse as themselves; anything else is
/// treated as a plain string.
fn parse_toml_value(raw: &str) -> toml::Value {
    let wrapped = format!("value = {}", raw);
    if let Ok(table) = wrapped.parse::<toml::Table>() {
        if let Some(value) = table.get("value") {
            return value.clone();
        }
    }
    toml::Value::String(raw.to_string())
}

fn set_dotted(table: &mut toml::Table, dotted_path: &str, value: toml::Value) -> Result<()> {
    let mut segments: Vec<&str> = dotted_path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(GitReleaseError::config(format!(
            "Invalid configuration path: '{}'",
            dotted_path
        )));
    }

    let leaf = segments.pop().ok_or_else(|| {
        GitReleaseError::config(format!("Invalid configuration path: '{}'", dotted_path))
    })?;

    let mut current = table;
    for segment in segments {
        if !current.contains_key(segment) {
            current.insert(
                segment.to_string(),
                toml::Value::Table(toml::Table::new()),
            );
        }
        current = current
            .get_mut(segment)
            .and_then(|v| v.as_table_mut())
            .ok_or_else(|| {
                GitReleaseError::config(format!(
                    "Configuration path '{}' crosses the non-table field '{}'",
                    dotted_path, segment
                ))
            })?;
    }

    current.insert(leaf.to_string(), value);
    Ok(())
}
