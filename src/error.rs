use crate::domain::stage::TransitionError;
use thiserror::Error;

/// Unified error type for git-release operations
#[derive(Error, Debug)]
pub enum GitReleaseError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Branch error: {0}")]
    Branch(String),

    #[error(transparent)]
    Stage(#[from] TransitionError),

    #[error("Verification failed: {0}")]
    Verification(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-release
pub type Result<T> = std::result::Result<T, GitReleaseError>;

impl GitReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitReleaseError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        GitReleaseError::Version(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        GitReleaseError::Tag(msg.into())
    }

    /// Create a branch error with context
    pub fn branch(msg: impl Into<String>) -> Self {
        GitReleaseError::Branch(msg.into())
    }

    /// Create a verification error with context
    pub fn verification(msg: impl Into<String>) -> Self {
        GitReleaseError::Verification(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        GitReleaseError::Remote(msg.into())
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        GitReleaseError::Manifest(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GitReleaseError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: GitReleaseError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_constructors() {
        assert!(GitReleaseError::version("test")
            .to_string()
            .contains("Version"));
        assert!(GitReleaseError::tag("test").to_string().contains("Tag"));
        assert!(GitReleaseError::branch("test")
            .to_string()
            .contains("Branch"));
    }

    #[test]
    fn test_error_from_transition() {
        let err: GitReleaseError = TransitionError::UnknownStage("qa".to_string()).into();
        assert!(err.to_string().contains("qa"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (GitReleaseError::config("x"), "Configuration error"),
            (GitReleaseError::version("x"), "Version parsing error"),
            (GitReleaseError::tag("x"), "Tag error"),
            (GitReleaseError::verification("x"), "Verification failed"),
            (GitReleaseError::remote("x"), "Remote operation failed"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }

    #[test]
    fn test_error_empty_messages() {
        let errors = vec![
            GitReleaseError::config(""),
            GitReleaseError::version(""),
            GitReleaseError::tag(""),
        ];

        for err in errors {
            // Even with empty message, the error type prefix should be present
            assert!(!err.to_string().is_empty());
        }
    }
}
