// src/models/run_summary.rs

/// Counters collected over one job run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub files_total: usize,
    /// Files attempted, successful or not.
    pub files_processed: usize,
    /// Files whose tags were rewritten or that were copied to a new home.
    pub files_changed: usize,
    pub files_failed: usize,
    pub cancelled: bool,
}

impl RunSummary {
    #[inline]
    #[must_use]
    pub const fn new(files_total: usize) -> Self {
        Self {
            files_total,
            files_processed: 0,
            files_changed: 0,
            files_failed: 0,
            cancelled: false,
        }
    }

    pub const fn record_success(&mut self, changed: bool) {
        self.files_processed = self.files_processed.saturating_add(1);
        if changed {
            self.files_changed = self.files_changed.saturating_add(1);
        }
    }

    pub const fn record_failure(&mut self) {
        self.files_processed = self.files_processed.saturating_add(1);
        self.files_failed = self.files_failed.saturating_add(1);
    }

    #[inline]
    #[must_use]
    pub const fn files_skipped(&self) -> usize {
        self.files_total.saturating_sub(self.files_processed)
    }
}
