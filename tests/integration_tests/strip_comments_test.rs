// tests/integration_tests/strip_comments_test.rs
use crate::common::{
    CORRUPT, TextTagStore, count_lines, memory_reporter, write_raw, write_tagged,
};
use anyhow::Result;
use std::fs;
use std::path::Path;
use tagwright::{
    CancelToken, DirectoryScanner, Job, JobState, PathFilter, StripCommentsJob, TagField,
    TagSet, TagStore,
};
use tempfile::TempDir;

fn mp3_scanner() -> Result<DirectoryScanner> {
    Ok(DirectoryScanner::new(PathFilter::new(["mp3"])?))
}

fn has_comment(store: &TextTagStore, path: &Path) -> Result<bool> {
    Ok(store.load(path)?.has(TagField::Comment))
}

#[test]
fn test_comments_are_removed_under_every_key() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    let canonical = write_tagged(root, "a.mp3", &[("title", "A"), ("comment", "ripped by x")])?;
    let legacy = write_tagged(root, "b.mp3", &[("title", "B"), ("COMMENTS", "old encoder")])?;
    let both = write_tagged(
        root,
        "c.mp3",
        &[("comment", "one"), ("Comments", "two"), ("title", "C")],
    )?;
    let clean = write_tagged(root, "d.mp3", &[("title", "D")])?;
    let clean_before = fs::read_to_string(&clean)?;

    let store = TextTagStore::default();
    let (reporter, log) = memory_reporter();
    let mut job = StripCommentsJob::new(root, mp3_scanner()?, store.clone(), reporter);
    let summary = job.run()?;

    for path in [&canonical, &legacy, &both, &clean] {
        assert!(
            !has_comment(&store, path)?,
            "{} should have no comment left",
            path.display()
        );
    }
    assert_eq!(
        store.load(&both)?.get(TagField::Title).as_deref(),
        Some("C"),
        "Other fields should survive"
    );
    assert_eq!(fs::read_to_string(&clean)?, clean_before);
    assert_eq!(store.commits(), 3, "Only files with comments are written");
    assert_eq!(summary.files_changed, 3);
    assert_eq!(summary.files_failed, 0);
    assert_eq!(count_lines(&log.lines(), "Done."), 1);
    Ok(())
}

#[test]
fn test_files_without_comments_are_not_written() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_tagged(temp_dir.path(), "one.mp3", &[("title", "One")])?;
    write_tagged(temp_dir.path(), "two.mp3", &[("artist", "Two")])?;

    let store = TextTagStore::default();
    let (reporter, _log) = memory_reporter();
    let summary =
        StripCommentsJob::new(temp_dir.path(), mp3_scanner()?, store.clone(), reporter).run()?;

    assert_eq!(store.commits(), 0);
    assert_eq!(summary.files_processed, 2);
    assert_eq!(summary.files_changed, 0);
    Ok(())
}

#[test]
fn test_unreadable_file_is_logged_and_skipped() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    write_tagged(root, "01.mp3", &[("comment", "x")])?;
    let broken = write_raw(root, "02.mp3", CORRUPT)?;
    let last = write_tagged(root, "03.mp3", &[("comment", "y")])?;

    let store = TextTagStore::default();
    let (reporter, log) = memory_reporter();
    let mut job = StripCommentsJob::new(root, mp3_scanner()?, store.clone(), reporter);
    let summary = job.run()?;

    let expected = format!("Tag could not be read: {}", broken.display());
    let lines = log.lines();
    assert_eq!(count_lines(&lines, &expected), 1, "Got {lines:?}");
    assert!(!has_comment(&store, &last)?, "Later files should still be processed");
    assert_eq!(summary.files_failed, 1);
    assert_eq!(summary.files_changed, 2);
    assert_eq!(job.progress().snapshot().files_done, 3);
    Ok(())
}

#[test]
fn test_progress_and_log_over_a_whole_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    write_tagged(root, "x/1.mp3", &[("comment", "c")])?;
    write_tagged(root, "x/2.mp3", &[])?;
    write_tagged(root, "y/3.mp3", &[("COMMENTS", "c")])?;
    write_raw(root, "y/readme.txt", "comment=not audio")?;

    let (reporter, log) = memory_reporter();
    let mut job = StripCommentsJob::new(root, mp3_scanner()?, TextTagStore::default(), reporter);
    assert!(!job.is_done());
    assert_eq!(job.progress_message().as_deref(), Some("Starting worker..."));

    let summary = job.run()?;

    let snapshot = job.progress().snapshot();
    assert_eq!(snapshot.files_total, 3);
    assert_eq!(snapshot.files_done, 3);
    assert_eq!(snapshot.state, JobState::Done);
    assert!(job.is_done());
    assert!(job.progress_message().is_none());
    assert!((job.progress_fraction() - 1.0).abs() < f32::EPSILON);
    assert_eq!(summary.files_total, 3);

    assert_eq!(
        log.lines(),
        vec![
            "Scanning directories for music...",
            "Erasing ID3 comments...",
            "Done.",
        ]
    );
    Ok(())
}

#[test]
fn test_invalid_source_aborts_the_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let not_a_dir = write_raw(temp_dir.path(), "file.mp3", "")?;

    let (reporter, log) = memory_reporter();
    let mut job =
        StripCommentsJob::new(&not_a_dir, mp3_scanner()?, TextTagStore::default(), reporter);
    let err = job.run().expect_err("a file is not a scan root");

    assert!(err.is_fatal());
    assert!(job.is_done(), "Observers should see the job end");
    assert_eq!(count_lines(&log.lines(), "Done."), 0);
    Ok(())
}

#[test]
fn test_cancelled_job_stops_before_the_next_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let first = write_tagged(temp_dir.path(), "a.mp3", &[("comment", "c")])?;
    write_tagged(temp_dir.path(), "b.mp3", &[("comment", "c")])?;

    let cancel = CancelToken::new();
    cancel.cancel();
    let store = TextTagStore::default();
    let (reporter, log) = memory_reporter();
    let mut job = StripCommentsJob::new(temp_dir.path(), mp3_scanner()?, store.clone(), reporter)
        .with_cancel_token(cancel);
    let summary = job.run()?;

    assert!(summary.cancelled);
    assert_eq!(summary.files_processed, 0);
    assert_eq!(job.progress().snapshot().files_done, 0);
    assert!(has_comment(&store, &first)?);
    assert_eq!(log.lines().last().map(String::as_str), Some("Cancelled."));
    assert!(job.is_done());
    Ok(())
}
