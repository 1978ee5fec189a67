use regex::Regex;
use std::fmt;

/// Commit types recognized by the conventional-commit grammar.
///
/// The set is fixed; anything outside it leaves the commit unclassified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitKind {
    Build,
    Chore,
    Ci,
    Docs,
    Feat,
    Fix,
    Perf,
    Refactor,
    Revert,
    Style,
    Test,
}

impl CommitKind {
    /// Parse a commit type keyword, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "build" => Some(CommitKind::Build),
            "chore" => Some(CommitKind::Chore),
            "ci" => Some(CommitKind::Ci),
            "docs" => Some(CommitKind::Docs),
            "feat" => Some(CommitKind::Feat),
            "fix" => Some(CommitKind::Fix),
            "perf" => Some(CommitKind::Perf),
            "refactor" => Some(CommitKind::Refactor),
            "revert" => Some(CommitKind::Revert),
            "style" => Some(CommitKind::Style),
            "test" => Some(CommitKind::Test),
            _ => None,
        }
    }

    /// Get the commit type keyword as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitKind::Build => "build",
            CommitKind::Chore => "chore",
            CommitKind::Ci => "ci",
            CommitKind::Docs => "docs",
            CommitKind::Feat => "feat",
            CommitKind::Fix => "fix",
            CommitKind::Perf => "perf",
            CommitKind::Refactor => "refactor",
            CommitKind::Revert => "revert",
            CommitKind::Style => "style",
            CommitKind::Test => "test",
        }
    }
}

impl fmt::Display for CommitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed representation of a conventional commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMeta {
    pub kind: CommitKind,
    pub scope: Option<String>,
    pub description: String,
    pub breaking: bool,
}

impl CommitMeta {
    /// Classify a commit message according to the conventional-commit grammar.
    ///
    /// Supported subject formats:
    /// - type(scope)!: description
    /// - type(scope): description
    /// - type!: description
    /// - type: description
    ///
    /// The type must belong to the fixed [CommitKind] set (case-insensitive).
    /// Breaking is marked by the `!` before the colon or by the literal
    /// `BREAKING CHANGE:` anywhere in the full message. Messages that do not
    /// match the grammar are unclassified and yield `None`.
    pub fn classify(message: &str) -> Option<Self> {
        let captures = Regex::new(r"(?i)^([a-z]+)(?:\(([^)]+)\))?(!?):\s*(.*)")
            .ok()
            .and_then(|re| re.captures(message))?;

        let kind = CommitKind::parse(captures.get(1)?.as_str())?;
        let scope = captures.get(2).map(|m| m.as_str().to_string());
        let has_exclamation = captures.get(3).map(|m| m.as_str()) == Some("!");
        let description = captures
            .get(4)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        let breaking = has_exclamation || message.contains("BREAKING CHANGE:");

        Some(CommitMeta {
            kind,
            scope,
            description,
            breaking,
        })
    }
}
