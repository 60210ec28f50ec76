// src/core/jobs.rs
pub mod relocate;
pub mod strip_comments;

pub use relocate::{RelocateJob, destination_path};
pub use strip_comments::StripCommentsJob;

use crate::core::report::Reporter;
use crate::core::scanner::DirectoryScanner;
use crate::error::Result;
use crate::models::{JobState, Progress, RunSummary};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

pub const SCANNING_STATUS: &str = "Scanning directories for music...";
pub const DONE_LINE: &str = "Done.";
pub const CANCELLED_LINE: &str = "Cancelled.";

/// A unit of batch work over a directory of audio files.
///
/// `run` blocks until the job is finished. Other threads follow along
/// through [`Job::progress`], which is safe to poll at any time.
pub trait Job: Send {
    fn name(&self) -> &'static str;

    /// Runs the job to completion.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidArgument`] if the source directory is
    /// unusable. Failures on individual files are logged and counted in the
    /// summary instead.
    fn run(&mut self) -> Result<RunSummary>;

    fn progress(&self) -> &Progress;

    fn progress_fraction(&self) -> f32 {
        self.progress().percent_done()
    }

    /// `Some` while the job has no meaningful percentage to show.
    fn progress_message(&self) -> Option<String> {
        self.progress().status()
    }

    fn is_done(&self) -> bool {
        self.progress().state() == JobState::Done
    }
}

/// Lets another thread stop a job between two files.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Shared scanning phase: announce, scan, then switch to numeric progress.
fn scan_phase(
    reporter: &Reporter,
    scanner: &DirectoryScanner,
    source: &Path,
    starting_line: &str,
) -> Result<Vec<PathBuf>> {
    let progress = reporter.progress();
    progress.begin_scan(SCANNING_STATUS);
    reporter.log(SCANNING_STATUS);

    let files = match scanner.scan(source) {
        Ok(files) => files,
        Err(err) => {
            progress.finish();
            return Err(err);
        }
    };

    progress.begin_processing(files.len());
    reporter.log(starting_line);
    progress.clear_status();
    Ok(files)
}

fn finish_run(reporter: &Reporter, job: &str, summary: &RunSummary) {
    reporter.log(if summary.cancelled {
        CANCELLED_LINE
    } else {
        DONE_LINE
    });
    reporter.progress().finish();
    info!(
        job,
        total = summary.files_total,
        changed = summary.files_changed,
        failed = summary.files_failed,
        cancelled = summary.cancelled,
        "job finished"
    );
}
