//! Pure formatting functions for UI output.
//!
//! This module contains all display logic separated from user interaction.

use crate::boundary::BoundaryWarning;
use crate::verify::VerificationResult;
use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a failure marker with red cross.
pub fn display_failure(message: &str) {
    println!("{} {}", style("✗").red(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display the outcome of a verification run, one line per check plus
/// the accumulated diagnostic messages.
pub fn display_verification(result: &VerificationResult) {
    display_check("working tree clean", result.clean);
    display_check("test suite", result.tests);
    display_check("ci checks", result.ci);
    display_check("conventional commits", result.commits);

    for message in &result.messages {
        println!("  {}", style(message).dim());
    }

    if result.overall() {
        display_success("All verification checks passed");
    } else {
        display_failure("Verification failed");
    }
}

fn display_check(name: &str, passed: bool) {
    if passed {
        println!("{} {}", style("✓").green(), name);
    } else {
        println!("{} {}", style("✗").red(), name);
    }
}

/// Display manual push instruction for a tag.
///
/// Shows the git command needed to push the tag to a remote.
pub fn display_manual_push_instruction(tag: &str, remote: &str) {
    println!(
        "\n{} To push this tag later, run:\n  {}",
        style("→").yellow(),
        style(format!("git push {} {}", remote, tag)).cyan()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }

    #[test]
    fn test_display_success() {
        // Visual verification test - output is printed to stdout
        display_success("test success");
    }

    #[test]
    fn test_display_verification() {
        let result = VerificationResult {
            clean: true,
            tests: true,
            ci: false,
            commits: true,
            messages: vec!["CI check 'lint' failed".to_string()],
        };
        display_verification(&result);
    }
}
