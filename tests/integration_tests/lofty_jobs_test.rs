// tests/integration_tests/lofty_jobs_test.rs
use crate::common::{memory_reporter, write_tagged_wav};
use anyhow::Result;
use lofty::TextEncoding;
use lofty::config::{ParseOptions, WriteOptions};
use lofty::file::AudioFile as _;
use lofty::id3::v2::{CommentFrame, Frame, Id3v2Tag};
use lofty::iff::wav::WavFile;
use lofty::tag::TagExt as _;
use std::fs::{self, File};
use std::path::Path;
use tagwright::{
    DirectoryScanner, Job, LoftyStore, PathFilter, RelocateJob, StripCommentsJob, TagField,
    TagSet, TagStore,
};
use tempfile::TempDir;

fn wav_scanner() -> Result<DirectoryScanner> {
    Ok(DirectoryScanner::new(PathFilter::new(["wav"])?))
}

fn read_id3v2(path: &Path) -> Result<Id3v2Tag> {
    let mut file = File::open(path)?;
    Ok(WavFile::read_from(&mut file, ParseOptions::new())?
        .remove_id3v2()
        .unwrap_or_default())
}

fn comment_descriptions(path: &Path) -> Result<Vec<String>> {
    Ok(read_id3v2(path)?
        .comments()
        .map(|frame| frame.description.clone())
        .collect())
}

#[test]
fn test_strip_comments_on_real_files() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    let commented = write_tagged_wav(
        root,
        "a.wav",
        &[(TagField::Title, "A"), (TagField::Comment, "ripped by x")],
    )?;
    let plain = write_tagged_wav(root, "b.wav", &[(TagField::Title, "B")])?;

    // Player data stored as a described comment frame must survive.
    let mut id3v2 = read_id3v2(&commented)?;
    id3v2.insert(Frame::Comment(CommentFrame::new(
        TextEncoding::UTF8,
        *b"eng",
        String::from("iTunNORM"),
        String::from(" 0000021A 00000214"),
    )));
    id3v2.save_to_path(&commented, WriteOptions::default())?;

    let (reporter, log) = memory_reporter();
    let summary = StripCommentsJob::new(root, wav_scanner()?, LoftyStore::new(), reporter).run()?;

    let store = LoftyStore::new();
    assert!(!store.load(&commented)?.has(TagField::Comment));
    assert_eq!(store.load(&commented)?.get(TagField::Title).as_deref(), Some("A"));
    assert_eq!(comment_descriptions(&commented)?, vec!["iTunNORM"]);
    assert_eq!(store.load(&plain)?.get(TagField::Title).as_deref(), Some("B"));
    assert_eq!(summary.files_changed, 1);
    assert_eq!(summary.files_failed, 0, "Got {:?}", log.lines());
    Ok(())
}

#[test]
fn test_relocate_real_file_with_article_casing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let source = temp_dir.path().join("incoming");
    let destination = temp_dir.path().join("library");
    let original = write_tagged_wav(
        &source,
        "track.wav",
        &[
            (TagField::AlbumArtist, "The Who"),
            (TagField::Album, "Live At Leeds"),
            (TagField::Title, "Young Man Blues"),
            (TagField::DiscNumber, "1"),
            (TagField::TrackNumber, "1"),
        ],
    )?;
    let before = fs::read(&original)?;

    let (reporter, log) = memory_reporter();
    let summary = RelocateJob::new(
        &source,
        &destination,
        wav_scanner()?,
        LoftyStore::new(),
        reporter,
    )
    .run()?;

    let copy = destination
        .join("The Who")
        .join("Live at Leeds")
        .join("1.01 - Young Man Blues.wav");
    assert!(copy.is_file(), "Got {:?}", log.lines());
    let store = LoftyStore::new();
    assert_eq!(
        store.load(&copy)?.get(TagField::Album).as_deref(),
        Some("Live at Leeds")
    );
    assert_eq!(fs::read(&original)?, before, "Source must not change");
    assert_eq!(summary.files_changed, 1);
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_strip_comments_through_symlink() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path().join("root");
    fs::create_dir_all(&root)?;
    let real = write_tagged_wav(
        temp_dir.path(),
        "library/real.wav",
        &[(TagField::Comment, "ripped by x")],
    )?;
    let link = root.join("link.wav");
    std::os::unix::fs::symlink(&real, &link)?;

    let (reporter, _log) = memory_reporter();
    let summary = StripCommentsJob::new(&root, wav_scanner()?, LoftyStore::new(), reporter).run()?;

    assert_eq!(summary.files_changed, 1);
    assert!(fs::symlink_metadata(&link)?.file_type().is_symlink());
    assert!(!LoftyStore::new().load(&real)?.has(TagField::Comment));
    Ok(())
}
