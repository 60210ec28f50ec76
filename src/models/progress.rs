// src/models/progress.rs
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Status shown before a job has started scanning.
pub const STARTING_STATUS: &str = "Starting worker...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Scanning,
    Processing,
    Done,
}

/// Point-in-time copy of a job's progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobProgress {
    pub state: JobState,
    pub files_done: usize,
    pub files_total: usize,
    /// `Some` while the display should be indeterminate.
    pub status: Option<String>,
}

impl JobProgress {
    #[inline]
    #[must_use]
    #[expect(clippy::as_conversions, reason = "Precision not critical")]
    #[expect(clippy::cast_precision_loss, reason = "Precision not critical")]
    pub fn percent_done(&self) -> f32 {
        if self.files_total == 0 {
            return if self.state == JobState::Done { 1.0 } else { 0.0 };
        }
        self.files_done as f32 / self.files_total as f32
    }

    #[inline]
    #[must_use]
    pub const fn is_indeterminate(&self) -> bool {
        self.status.is_some()
    }
}

#[derive(Debug)]
struct Phase {
    state: JobState,
    status: Option<String>,
}

#[derive(Debug)]
struct Shared {
    done: AtomicUsize,
    total: AtomicUsize,
    phase: Mutex<Phase>,
}

/// Shared, always-current progress of a running job.
///
/// The worker writes, any number of observers read. Cloning is cheap and
/// every clone sees the same state. Reads never wait on the worker beyond
/// the time it takes to copy the status string.
#[derive(Debug, Clone)]
pub struct Progress {
    shared: Arc<Shared>,
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress {
    #[must_use]
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                done: AtomicUsize::new(0),
                total: AtomicUsize::new(0),
                phase: Mutex::new(Phase {
                    state: JobState::Idle,
                    status: Some(String::from(STARTING_STATUS)),
                }),
            }),
        }
    }

    fn phase(&self) -> MutexGuard<'_, Phase> {
        self.shared
            .phase
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Enters the scanning phase. Counters reset and the display goes
    /// indeterminate with `status`.
    pub fn begin_scan(&self, status: &str) {
        self.shared.done.store(0, Ordering::Release);
        self.shared.total.store(0, Ordering::Release);
        let mut phase = self.phase();
        phase.state = JobState::Scanning;
        phase.status = Some(status.to_owned());
    }

    /// Enters the processing phase with a known number of files. The status
    /// stays up until [`Progress::clear_status`].
    pub fn begin_processing(&self, total: usize) {
        self.shared.done.store(0, Ordering::Release);
        self.shared.total.store(total, Ordering::Release);
        self.phase().state = JobState::Processing;
    }

    /// Switches the display to numeric progress.
    pub fn clear_status(&self) {
        self.phase().status = None;
    }

    /// Records that one more file has been attempted. Never exceeds the total.
    pub fn advance(&self) {
        let total = self.shared.total.load(Ordering::Acquire);
        let _ = self
            .shared
            .done
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |done| {
                (done < total).then(|| done.saturating_add(1))
            });
    }

    pub fn finish(&self) {
        self.phase().state = JobState::Done;
    }

    #[must_use]
    pub fn snapshot(&self) -> JobProgress {
        let (state, status) = {
            let phase = self.phase();
            (phase.state, phase.status.clone())
        };
        JobProgress {
            state,
            files_done: self.shared.done.load(Ordering::Acquire),
            files_total: self.shared.total.load(Ordering::Acquire),
            status,
        }
    }

    #[must_use]
    pub fn percent_done(&self) -> f32 {
        self.snapshot().percent_done()
    }

    #[must_use]
    pub fn status(&self) -> Option<String> {
        self.phase().status.clone()
    }

    #[must_use]
    pub fn state(&self) -> JobState {
        self.phase().state
    }
}
