// src/utils.rs
use crate::models::{JobProgress, RunSummary};

/// Renders a progress snapshot the way the shell shows it: the status
/// message while indeterminate, otherwise a percentage with counts.
#[must_use]
pub fn format_progress(progress: &JobProgress) -> String {
    progress.status.as_ref().map_or_else(
        || {
            format!(
                "{:5.1}% ({}/{})",
                progress.percent_done() * 100.0,
                progress.files_done,
                progress.files_total
            )
        },
        Clone::clone,
    )
}

/// Prints progress lines to stderr, skipping repeats of the previous line.
#[derive(Debug, Default)]
pub struct ProgressPrinter {
    last: Option<String>,
}

impl ProgressPrinter {
    /// Returns the line that was printed, if any.
    pub fn update(&mut self, progress: &JobProgress) -> Option<&str> {
        let line = format_progress(progress);
        if self.last.as_deref() == Some(line.as_str()) {
            return None;
        }
        eprintln!("{line}");
        self.last = Some(line);
        self.last.as_deref()
    }
}

pub fn print_summary(summary: &RunSummary) {
    println!("Files found: {}", summary.files_total);
    println!("Files changed: {}", summary.files_changed);
    println!("Files failed: {}", summary.files_failed);
    if summary.cancelled {
        println!("Files skipped: {}", summary.files_skipped());
    }
}
