// src/models.rs
mod progress;
mod run_summary;
mod tag_field;

pub use progress::{JobProgress, JobState, Progress, STARTING_STATUS};
pub use run_summary::RunSummary;
pub use tag_field::TagField;
