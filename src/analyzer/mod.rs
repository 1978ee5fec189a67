//! Analysis engine for version decisions and release notes

pub mod notes;
pub mod version_analyzer;

pub use notes::build_release_notes;
pub use version_analyzer::VersionAnalyzer;
