use crate::domain::version::Version;

/// Compute the release tag name for a version (`{tag_prefix}{version}`)
pub fn release_tag_name(tag_prefix: &str, version: &Version) -> String {
    format!("{}{}", tag_prefix, version)
}

/// Recover the version text from a tag by stripping the configured prefix.
///
/// Tags that do not carry the prefix are returned unchanged, so bare
/// `1.2.3` tags still resolve.
pub fn strip_tag_prefix<'a>(tag: &'a str, tag_prefix: &str) -> &'a str {
    tag.strip_prefix(tag_prefix).unwrap_or(tag)
}

/// Parse the version embedded in a tag, prefix-aware.
///
/// Returns `None` when the remainder is not a valid semantic version.
pub fn version_from_tag(tag: &str, tag_prefix: &str) -> Option<Version> {
    Version::parse(strip_tag_prefix(tag, tag_prefix))
}
