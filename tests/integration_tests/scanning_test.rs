// tests/integration_tests/scanning_test.rs
use crate::common::write_raw;
use anyhow::Result;
use std::collections::HashSet;
use tagwright::{DirectoryScanner, ExcludePatterns, PathFilter, scan_directory};
use tempfile::TempDir;

#[test]
fn test_scan_returns_every_matching_file_once() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    let expected: HashSet<_> = [
        "a.mp3",
        "Shouting.MP3",
        "disc 1/track.Mp3",
        "disc 1/deeper/still/track.mp3",
    ]
    .iter()
    .map(|name| write_raw(root, name, "audio"))
    .collect::<Result<_>>()?;
    write_raw(root, "disc 1/cover.png", "image")?;
    write_raw(root, "mp3", "no extension")?;
    write_raw(root, "notes.mp3.txt", "text")?;

    let files = scan_directory(root, &["mp3"])?;
    let found: HashSet<_> = files.iter().cloned().collect();

    assert_eq!(files.len(), found.len(), "No file should be listed twice");
    assert_eq!(found, expected, "Exactly the .mp3 files should be found");
    assert!(
        files.iter().all(|path| path.is_absolute()),
        "All results should be absolute"
    );
    Ok(())
}

#[test]
fn test_scan_with_several_extensions_and_excludes() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    write_raw(root, "keep/a.flac", "audio")?;
    write_raw(root, "keep/b.ogg", "audio")?;
    write_raw(root, "keep/c.mp3", "audio")?;
    write_raw(root, "skip/d.flac", "audio")?;
    write_raw(root, "keep/e.partial.flac", "audio")?;

    let filter = PathFilter::from_list(".FLAC, ogg")?;
    let excludes = ExcludePatterns::from_list("skip/,*.partial.flac")?;
    let files = DirectoryScanner::new(filter)
        .with_excludes(excludes)
        .scan(root)?;

    let names: Vec<_> = files
        .iter()
        .filter_map(|path| path.file_name()?.to_str())
        .collect();
    assert_eq!(names, vec!["a.flac", "b.ogg"]);
    Ok(())
}

#[test]
fn test_scan_of_missing_root_is_fatal() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let err = scan_directory(&temp_dir.path().join("missing"), &["mp3"])
        .expect_err("missing root should fail");
    assert!(err.is_fatal(), "Got {err}");
    Ok(())
}
