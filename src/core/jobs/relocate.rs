// src/core/jobs/relocate.rs
use crate::core::jobs::{CancelToken, Job, finish_run, scan_phase};
use crate::core::normalize::{articles_to_lower, prepare_file_name};
use crate::core::report::Reporter;
use crate::core::scanner::DirectoryScanner;
use crate::core::scanner::filter::extension_of;
use crate::core::tags::{TagSet, TagStore};
use crate::error::{Error, Result};
use crate::models::{Progress, RunSummary, TagField};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const STARTING_LINE: &str = "Starting file transfer...";

/// Builds `<root>/<artist>/<album>/<disc>.<track> - <title>.<ext>` from a
/// file's tags.
///
/// The album artist wins over the track artist unless it is empty. Artist,
/// album, title and disc go through [`prepare_file_name`], album and title
/// additionally through [`articles_to_lower`]. The track number is padded
/// to two digits and the source extension is kept as it is.
///
/// # Errors
///
/// Returns [`Error::Format`] if the track number is missing or not a
/// non-negative integer, or if the artist or album would not name a
/// directory of its own below `root` (empty, `.` or `..`).
pub fn destination_path<T>(root: &Path, source: &Path, tags: &T) -> Result<PathBuf>
where
    T: TagSet + ?Sized,
{
    let (artist_field, artist) = match tags.get(TagField::AlbumArtist) {
        Some(album_artist) if !album_artist.is_empty() => (TagField::AlbumArtist, album_artist),
        _ => (
            TagField::Artist,
            tags.get(TagField::Artist).unwrap_or_default(),
        ),
    };
    let album = tags.get(TagField::Album).unwrap_or_default();
    let title = tags.get(TagField::Title).unwrap_or_default();
    let disc = tags.get(TagField::DiscNumber).unwrap_or_default();
    let track_text = tags.get(TagField::TrackNumber).unwrap_or_default();

    let track: u32 = track_text.parse().map_err(|_| Error::Format {
        field: TagField::TrackNumber,
        value: track_text.clone(),
    })?;

    let artist = directory_name(artist_field, prepare_file_name(&artist))?;
    let album = directory_name(TagField::Album, articles_to_lower(&prepare_file_name(&album)))?;
    let title = articles_to_lower(&prepare_file_name(&title));
    let disc = prepare_file_name(&disc);
    let extension = extension_of(source).unwrap_or_default();

    Ok(root
        .join(artist)
        .join(album)
        .join(format!("{disc}.{track:02} - {title}.{extension}")))
}

fn directory_name(field: TagField, value: String) -> Result<String> {
    if matches!(value.as_str(), "" | "." | "..") {
        return Err(Error::Format { field, value });
    }
    Ok(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Relocated,
    CopyFailed,
    RetagFailed,
}

/// Copies every matching file into an artist/album tree named from its tags
/// and tidies the copy's album and title casing.
///
/// Source files are never modified.
#[derive(Debug)]
pub struct RelocateJob<S> {
    source: PathBuf,
    destination: PathBuf,
    scanner: DirectoryScanner,
    store: S,
    reporter: Reporter,
    cancel: CancelToken,
}

impl<S: TagStore> RelocateJob<S> {
    #[must_use]
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        scanner: DirectoryScanner,
        store: S,
        reporter: Reporter,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
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

    fn relocate(&self, source: &Path) -> Result<Outcome> {
        let destination = {
            let tags = self.store.load(source)?;
            destination_path(&self.destination, source, &tags)?
        };

        if let Err(err) = copy_file(source, &destination) {
            warn!(error = %err, "copy failed");
            self.reporter
                .log(&format!("Could not copy file: {}", source.display()));
            return Ok(Outcome::CopyFailed);
        }

        if let Err(err) = self.clean_metadata(&destination) {
            warn!(error = %err, "metadata clean-up failed");
            self.reporter.log(&format!(
                "Could update file metadata: {}",
                destination.display()
            ));
            return Ok(Outcome::RetagFailed);
        }

        debug!(
            from = %source.display(),
            to = %destination.display(),
            "relocated"
        );
        Ok(Outcome::Relocated)
    }

    /// Applies article casing to the copy's album and title. Returns whether
    /// anything had to be written.
    fn clean_metadata(&self, destination: &Path) -> Result<bool> {
        let mut tags = self.store.load(destination)?;
        let album = tags.get(TagField::Album).unwrap_or_default();
        let title = tags.get(TagField::Title).unwrap_or_default();

        let cleaned_album = articles_to_lower(&album);
        let cleaned_title = articles_to_lower(&title);
        if cleaned_album == album && cleaned_title == title {
            return Ok(false);
        }

        tags.set(TagField::Album, &cleaned_album);
        tags.set(TagField::Title, &cleaned_title);
        tags.commit()?;
        Ok(true)
    }
}

fn copy_file(source: &Path, destination: &Path) -> Result<()> {
    let copy_error = |source_err| Error::Copy {
        from: source.to_path_buf(),
        to: destination.to_path_buf(),
        source: source_err,
    };

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(copy_error)?;
    }

    // Copying a file onto itself would truncate it.
    if let (Ok(from), Ok(to)) = (fs::canonicalize(source), fs::canonicalize(destination)) {
        if from == to {
            return Ok(());
        }
    }

    fs::copy(source, destination).map_err(copy_error)?;
    Ok(())
}

impl<S: TagStore> Job for RelocateJob<S> {
    fn name(&self) -> &'static str {
        "relocate"
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

            match self.relocate(file) {
                Ok(Outcome::Relocated) => summary.record_success(true),
                Ok(Outcome::CopyFailed | Outcome::RetagFailed) => summary.record_failure(),
                Err(err) => {
                    debug!(path = %file.display(), error = %err, "relocation failed");
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
