// src/cli.rs
use anyhow::{Context as _, Result, bail};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::core::jobs::{Job, RelocateJob, StripCommentsJob};
use crate::core::report::{Reporter, TimestampedLog};
use crate::core::scanner::{DirectoryScanner, ExcludePatterns, PathFilter};
use crate::core::tags::LoftyStore;
use crate::models::{Progress, RunSummary};
use crate::utils::{ProgressPrinter, print_summary};

/// How often the shell samples a running job's progress.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Remove comment tags in place
    StripComments,
    /// Copy files into <dest>/<artist>/<album>/ named from their tags
    Relocate,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Job to run
    #[arg(short, long, value_enum)]
    pub mode: Mode,

    /// Directory to scan for audio files
    #[arg(short, long, env = "TAGWRIGHT_SOURCE")]
    pub source: PathBuf,

    /// Library root that relocated files are copied into
    #[arg(short, long, env = "TAGWRIGHT_DEST")]
    pub dest: Option<PathBuf>,

    /// File extensions to process (comma-separated)
    #[arg(short, long, env = "TAGWRIGHT_EXT", default_value = "mp3")]
    pub ext: String,

    /// Glob patterns for files or directories to skip (comma-separated)
    #[arg(short = 'x', long, default_value = "")]
    pub exclude: String,

    /// Show debug diagnostics on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Builds the selected job, runs it on a worker thread and reports its
/// progress until it finishes.
///
/// # Errors
///
/// This function may return an error if:
/// * The extension list or an exclude pattern is invalid
/// * `relocate` is selected without `--dest`
/// * The source is not a directory
/// * The worker thread panics
pub fn run(args: Args) -> Result<RunSummary> {
    let filter = PathFilter::from_list(&args.ext).context("Invalid --ext")?;
    let excludes = ExcludePatterns::from_list(&args.exclude).context("Invalid --exclude")?;
    let scanner = DirectoryScanner::new(filter).with_excludes(excludes);
    let reporter = Reporter::new(Arc::new(TimestampedLog::stdout()));

    let job: Box<dyn Job> = match args.mode {
        Mode::StripComments => Box::new(StripCommentsJob::new(
            args.source,
            scanner,
            LoftyStore::new(),
            reporter,
        )),
        Mode::Relocate => {
            let Some(dest) = args.dest else {
                bail!("--dest is required in relocate mode");
            };
            Box::new(RelocateJob::new(
                args.source,
                dest,
                scanner,
                LoftyStore::new(),
                reporter,
            ))
        }
    };

    let summary = run_job(job)?;
    print_summary(&summary);
    Ok(summary)
}

/// Runs `job` on its own thread while this thread polls its progress.
///
/// # Errors
///
/// Returns the job's fatal error, or an error if the worker panics.
pub fn run_job(mut job: Box<dyn Job>) -> Result<RunSummary> {
    let progress: Progress = job.progress().clone();
    let name = job.name();
    let worker = thread::Builder::new()
        .name(format!("{name}-worker"))
        .spawn(move || job.run())
        .context("Failed to start worker thread")?;

    let mut printer = ProgressPrinter::default();
    while !worker.is_finished() {
        printer.update(&progress.snapshot());
        thread::sleep(POLL_INTERVAL);
    }
    printer.update(&progress.snapshot());

    let outcome = worker
        .join()
        .map_err(|_| anyhow::anyhow!("{name} worker panicked"))?;
    outcome.with_context(|| format!("{name} failed"))
}
