//! CLI output formatting.
//!
//! The console shows one entry per site file, led by its position in the run,
//! with the result as indented context. Details of failures go to the log
//! file; the console only names the file.
//!
//! # Output Format
//!
//! ## Convert
//!
//! ```text
//! 001/004 about.html
//!     converted → about.html
//! 002/004 post.md
//!     Warning: Pandoc template was not located
//!     converted → blog/post.html
//! 003/004 logo.png
//!     unchanged
//! 004/004 broken.md
//!     Error: pandoc exited with status 64
//!     failed
//!
//! File "/site/content/broken.md" failed to convert
//! See log for more details
//! Converted 2, skipped 1, failed 1 (4 total)
//! ```
//!
//! ## Clean
//!
//! ```text
//! Cleaned /site/public
//! ```
//!
//! # Architecture
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::clean::CleanOutcome;
use crate::pipeline::{BuildEvent, BuildReport};
use crate::site_file::FileState;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Indentation for context lines under an entry.
const INDENT: &str = "    ";

/// Show `path` relative to `root` when it lies below it.
fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

// ============================================================================
// Convert
// ============================================================================

/// Format a single progress event as display lines.
///
/// Output paths are shown relative to `output_root`.
pub fn format_build_event(event: &BuildEvent, output_root: &Path) -> Vec<String> {
    match event {
        BuildEvent::Started { index, total, name } => {
            vec![format!("{:03}/{:03} {}", index, total, name)]
        }
        BuildEvent::Warning { message, .. } => vec![format!("{INDENT}Warning: {message}")],
        BuildEvent::Failed { reason, .. } => vec![format!("{INDENT}Error: {reason}")],
        BuildEvent::Finished { state, output, .. } => match (state, output) {
            (FileState::Succeeded, Some(output)) => vec![format!(
                "{INDENT}converted \u{2192} {}",
                display_relative(output, output_root)
            )],
            (FileState::Succeeded, None) => vec![format!("{INDENT}converted")],
            (FileState::Skipped, _) => vec![format!("{INDENT}unchanged")],
            (FileState::Failed, _) => vec![format!("{INDENT}failed")],
            (FileState::Unchecked | FileState::Converting, _) => Vec::new(),
        },
    }
}

/// Format the end-of-run summary.
///
/// Every failed file is named; the reason is only in the log.
pub fn format_report(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();
    let failed = report.failed();

    if !failed.is_empty() {
        lines.push(String::new());
        for path in &failed {
            lines.push(format!("File \"{}\" failed to convert", path.display()));
        }
        lines.push("See log for more details".to_string());
    }

    lines.push(format!(
        "Converted {}, skipped {}, failed {} ({} total)",
        report.converted(),
        report.skipped(),
        failed.len(),
        report.total()
    ));
    lines
}

/// Print a single progress event to stdout.
pub fn print_build_event(event: &BuildEvent, output_root: &Path) {
    for line in format_build_event(event, output_root) {
        println!("{}", line);
    }
}

/// Print the end-of-run summary to stdout.
pub fn print_report(report: &BuildReport) {
    for line in format_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Clean
// ============================================================================

pub fn format_clean_output(outcome: CleanOutcome, output_root: &Path) -> Vec<String> {
    match outcome {
        CleanOutcome::Missing => vec![format!(
            "Nothing to clean: {} does not exist",
            output_root.display()
        )],
        CleanOutcome::Cleaned => vec![format!("Cleaned {}", output_root.display())],
    }
}

pub fn print_clean_output(outcome: CleanOutcome, output_root: &Path) {
    for line in format_clean_output(outcome, output_root) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::FileOutcome;
    use std::path::PathBuf;

    fn outcome(path: &str, state: FileState) -> FileOutcome {
        FileOutcome {
            path: PathBuf::from(path),
            state,
            output: None,
            warnings: Vec::new(),
            error: None,
        }
    }

    // =========================================================================
    // Event formatting tests
    // =========================================================================

    #[test]
    fn format_started_pads_position() {
        let event = BuildEvent::Started {
            index: 7,
            total: 12,
            name: "post.md".into(),
        };
        assert_eq!(
            format_build_event(&event, Path::new("/out")),
            vec!["007/012 post.md"]
        );
    }

    #[test]
    fn format_finished_converted_shows_relative_output() {
        let event = BuildEvent::Finished {
            name: "post.md".into(),
            state: FileState::Succeeded,
            output: Some(PathBuf::from("/out/blog/post.html")),
        };
        assert_eq!(
            format_build_event(&event, Path::new("/out")),
            vec!["    converted \u{2192} blog/post.html"]
        );
    }

    #[test]
    fn format_finished_output_outside_root_shown_in_full() {
        let event = BuildEvent::Finished {
            name: "post.md".into(),
            state: FileState::Succeeded,
            output: Some(PathBuf::from("/elsewhere/post.html")),
        };
        assert_eq!(
            format_build_event(&event, Path::new("/out")),
            vec!["    converted \u{2192} /elsewhere/post.html"]
        );
    }

    #[test]
    fn format_finished_skipped_and_failed() {
        let skipped = BuildEvent::Finished {
            name: "a.png".into(),
            state: FileState::Skipped,
            output: None,
        };
        let failed = BuildEvent::Finished {
            name: "b.md".into(),
            state: FileState::Failed,
            output: None,
        };
        assert_eq!(format_build_event(&skipped, Path::new("/out")), vec!["    unchanged"]);
        assert_eq!(format_build_event(&failed, Path::new("/out")), vec!["    failed"]);
    }

    #[test]
    fn format_warning_and_error() {
        let warning = BuildEvent::Warning {
            name: "a.md".into(),
            message: "Pandoc template was not located".into(),
        };
        let failed = BuildEvent::Failed {
            path: PathBuf::from("/in/a.md"),
            reason: "pandoc exited with status 64".into(),
        };
        assert_eq!(
            format_build_event(&warning, Path::new("/out")),
            vec!["    Warning: Pandoc template was not located"]
        );
        assert_eq!(
            format_build_event(&failed, Path::new("/out")),
            vec!["    Error: pandoc exited with status 64"]
        );
    }

    // =========================================================================
    // Report formatting tests
    // =========================================================================

    #[test]
    fn format_report_all_good() {
        let report = BuildReport {
            outcomes: vec![
                outcome("/in/a.md", FileState::Succeeded),
                outcome("/in/b.png", FileState::Skipped),
            ],
        };
        assert_eq!(
            format_report(&report),
            vec!["Converted 1, skipped 1, failed 0 (2 total)"]
        );
    }

    #[test]
    fn format_report_lists_failures() {
        let report = BuildReport {
            outcomes: vec![
                outcome("/in/a.md", FileState::Failed),
                outcome("/in/b.md", FileState::Succeeded),
                outcome("/in/c.md", FileState::Failed),
            ],
        };
        assert_eq!(
            format_report(&report),
            vec![
                "",
                "File \"/in/a.md\" failed to convert",
                "File \"/in/c.md\" failed to convert",
                "See log for more details",
                "Converted 1, skipped 0, failed 2 (3 total)",
            ]
        );
    }

    #[test]
    fn format_report_empty_run() {
        assert_eq!(
            format_report(&BuildReport::default()),
            vec!["Converted 0, skipped 0, failed 0 (0 total)"]
        );
    }

    // =========================================================================
    // Clean formatting tests
    // =========================================================================

    #[test]
    fn format_clean_outcomes() {
        assert_eq!(
            format_clean_output(CleanOutcome::Cleaned, Path::new("/site/public")),
            vec!["Cleaned /site/public"]
        );
        assert_eq!(
            format_clean_output(CleanOutcome::Missing, Path::new("/site/public")),
            vec!["Nothing to clean: /site/public does not exist"]
        );
    }
}
