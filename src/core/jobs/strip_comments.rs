// src/core/jobs/strip_comments.rs
use crate::core::jobs::{CancelToken, Job, finish_run, scan_phase};
use crate::core::report::Reporter;
use crate::core::scanner::DirectoryScanner;
use crate::core::tags::{TagSet, TagStore};
use crate::error::Result;
use crate::models::{Progress, RunSummary, TagField};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const STARTING_LINE: &str = "Erasing ID3 comments...";

/// Removes the comment field, under every key it may be stored as, from
/// each matching file below a directory.
#[derive(Debug)]
pub struct StripCommentsJob<S> {
    source: PathBuf,
    scanner: DirectoryScanner,
    store: S,
    reporter: Reporter,
    cancel: CancelToken,
}

impl<S: TagStore> StripCommentsJob<S> {
    #[must_use]
    pub fn new(
        source: impl Into<PathBuf>,
        scanner: DirectoryScanner,
        store: S,
        reporter: Reporter,
    ) -> Self {
        Self {
            source: source.into(),
            scanner,
            store,
            reporter,
            cancel: CancelToken::new(),
        }
    }

    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns whether the file had a comment that was removed.
    fn strip(&self, file: &Path) -> Result<bool> {
        let mut tags = self.store.load(file)?;
        if !tags.has(TagField::Comment) {
            return Ok(false);
        }
        tags.delete(TagField::Comment);
        tags.commit()?;
        Ok(true)
    }
}

impl<S: TagStore> Job for StripCommentsJob<S> {
    fn name(&self) -> &'static str {
        "strip-comments"
    }

    fn run(&mut self) -> Result<RunSummary> {
        let files = scan_phase(&self.reporter, &self.scanner, &self.source, STARTING_LINE)?;
        let mut summary = RunSummary::new(files.len());

        for file in &files {
            if self.cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }
            self.reporter.progress().advance();

            match self.strip(file) {
                Ok(changed) => {
                    debug!(path = %file.display(), changed, "processed");
                    summary.record_success(changed);
                }
                Err(err) => {
                    debug!(path = %file.display(), error = %err, "comment removal failed");
                    summary.record_failure();
                    self.reporter
                        .log(&format!("Tag could not be read: {}", file.display()));
                }
            }
        }

        finish_run(&self.reporter, self.name(), &summary);
        Ok(summary)
    }

    fn progress(&self) -> &Progress {
        self.reporter.progress()
    }
}
