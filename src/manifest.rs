use crate::error::{GitReleaseError, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// A single declared dependency, simplified to name and version requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyEntry {
    pub name: String,
    pub version: String,
}

/// Read the project manifest and produce the simplified dependency list
/// captured in release snapshots.
///
/// A missing manifest is not an error: the snapshot then carries an empty
/// list. Dependencies declared as plain version strings and as detailed
/// tables (with a `version` key) are both supported; path/git entries
/// without a version are recorded as `*`.
pub fn read_dependencies(manifest_path: &Path) -> Result<Vec<DependencyEntry>> {
    if !manifest_path.exists() {
        return Ok(Vec::new());
    }

    let text = fs::read_to_string(manifest_path)?;
    let table: toml::Table = text.parse().map_err(|e| {
        GitReleaseError::manifest(format!(
            "Cannot parse {}: {}",
            manifest_path.display(),
            e
        ))
    })?;

    let mut entries = Vec::new();
    if let Some(deps) = table.get("dependencies").and_then(|v| v.as_table()) {
        for (name, value) in deps {
            entries.push(DependencyEntry {
                name: name.clone(),
                version: version_of(value),
            });
        }
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

fn version_of(value: &toml::Value) -> String {
    match value {
        toml::Value::String(version) => version.clone(),
        toml::Value::Table(table) => table
            .get("version")
            .and_then(|v| v.as_str())
            .unwrap_or("*")
            .to_string(),
        _ => "*".to_string(),
    }
}
