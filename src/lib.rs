// src/lib.rs
//! Batch clean-up of audio file tags, and tag-driven relocation of the
//! files themselves into an `artist/album/` library layout.

pub mod cli;
pub mod core;
pub mod error;
pub mod logging;
pub mod models;
pub mod utils;

pub use crate::cli::{Args, Mode, run, run_job};
pub use crate::core::jobs::{
    CancelToken, Job, RelocateJob, StripCommentsJob, destination_path,
};
pub use crate::core::normalize::{articles_to_lower, prepare_file_name};
pub use crate::core::report::{LogSink, MemoryLog, Reporter, TimestampedLog};
pub use crate::core::scanner::{DirectoryScanner, ExcludePatterns, PathFilter, scan_directory};
pub use crate::core::tags::{LoftyStore, TagSet, TagStore};
pub use crate::error::{Error, Result};
pub use crate::logging::init_logging;
pub use crate::models::{JobProgress, JobState, Progress, RunSummary, TagField};
