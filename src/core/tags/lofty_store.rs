// src/core/tags/lofty_store.rs
use crate::core::scanner::filter::extension_of;
use crate::core::tags::{TagSet, TagStore};
use crate::error::{Error, Result};
use crate::models::TagField;
use lofty::aac::AacFile;
use lofty::ape::{ApeFile, ApeTag};
use lofty::config::{ParseOptions, WriteOptions};
use lofty::error::LoftyError;
use lofty::file::{AudioFile, FileType, TaggedFileExt as _};
use lofty::flac::FlacFile;
use lofty::id3::v2::Id3v2Tag;
use lofty::iff::aiff::AiffFile;
use lofty::iff::wav::WavFile;
use lofty::mp4::{Ilst, Mp4File};
use lofty::mpeg::MpegFile;
use lofty::musepack::MpcFile;
use lofty::ogg::{OpusFile, SpeexFile, VorbisComments, VorbisFile};
use lofty::probe::Probe;
use lofty::tag::{ItemKey, ItemValue, MergeTag, SplitTag, Tag, TagExt, TagItem};
use lofty::wavpack::WavPackFile;
use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{Dispatch, debug};

type LoftyResult<T> = std::result::Result<T, LoftyError>;

/// [`TagStore`] backed by `lofty`, covering ID3, Vorbis comments, MP4, APE
/// and the other formats `lofty` understands.
///
/// Files whose primary tag is ID3v2, Vorbis comments, MP4 `ilst` or APE are
/// edited through their native tag, so frames with no generic counterpart
/// (private frames, iTunes normalization comments, embedded objects) are
/// written back untouched.
#[derive(Debug, Clone, Copy)]
pub struct LoftyStore {
    parse_options: ParseOptions,
}

impl Default for LoftyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LoftyStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::new(),
        }
    }

    /// Falls back to `lofty`'s generic view for files without a native
    /// primary tag, such as an MP3 carrying only ID3v1.
    fn read_generic(&self, path: &Path) -> LoftyResult<Tag> {
        let tagged_file = Probe::open(path)?.options(self.parse_options).read()?;
        Ok(tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag())
            .cloned()
            .unwrap_or_else(|| Tag::new(tagged_file.primary_tag_type())))
    }
}

impl TagStore for LoftyStore {
    type Tags = LoftyTags;

    fn load(&self, path: &Path) -> Result<LoftyTags> {
        let (native, tag) = quietly(|| -> LoftyResult<(Option<Native>, Tag)> {
            match read_native(path, self.parse_options)? {
                Some((native, tag)) => Ok((Some(native), tag)),
                None => self.read_generic(path).map(|tag| (None, tag)),
            }
        })
        .map_err(|err| Error::tag_read(path, err))?;

        debug!(
            path = %path.display(),
            tag_type = ?tag.tag_type(),
            items = tag.len(),
            native = native.is_some(),
            "loaded tags"
        );

        Ok(LoftyTags {
            path: path.to_path_buf(),
            tag,
            native,
        })
    }
}

/// Runs `f` with every `tracing` event on this thread discarded.
///
/// `lofty` reports recoverable oddities in the files it parses through the
/// `log` facade, which the subscriber bridges into `tracing`. Those warnings
/// are noise next to the per-file report line. The previous dispatcher comes
/// back when the guard drops, even if `f` panics.
fn quietly<T>(f: impl FnOnce() -> T) -> T {
    let _silenced = tracing::dispatcher::set_default(&Dispatch::none());
    f()
}

/// What is left of a native primary tag once its generic items have been
/// split off into a [`Tag`].
#[derive(Debug)]
enum Native {
    Id3v2(<Id3v2Tag as SplitTag>::Remainder),
    VorbisComments(<VorbisComments as SplitTag>::Remainder),
    Ilst(<Ilst as SplitTag>::Remainder),
    Ape(<ApeTag as SplitTag>::Remainder),
}

impl Native {
    /// Merges `tag` back in and writes the result to `path`. The remainder is
    /// handed back whether or not the write succeeded.
    fn save(self, tag: &Tag, path: &Path) -> (Self, LoftyResult<()>) {
        match self {
            Self::Id3v2(rest) => {
                let (rest, saved) = save_merged(rest, tag, path);
                (Self::Id3v2(rest), saved)
            }
            Self::VorbisComments(rest) => {
                let (rest, saved) = save_merged(rest, tag, path);
                (Self::VorbisComments(rest), saved)
            }
            Self::Ilst(rest) => {
                let (rest, saved) = save_merged(rest, tag, path);
                (Self::Ilst(rest), saved)
            }
            Self::Ape(rest) => {
                let (rest, saved) = save_merged(rest, tag, path);
                (Self::Ape(rest), saved)
            }
        }
    }
}

fn save_merged<R>(rest: R, tag: &Tag, path: &Path) -> (R, LoftyResult<()>)
where
    R: MergeTag,
    R::Merged: TagExt<Err = LoftyError> + SplitTag<Remainder = R>,
{
    let merged = rest.merge_tag(tag.clone());
    let saved = merged.save_to_path(path, WriteOptions::default());
    let (rest, _) = merged.split_tag();
    (rest, saved)
}

fn split<T: SplitTag>(tag: Option<T>, wrap: fn(T::Remainder) -> Native) -> Option<(Native, Tag)> {
    tag.map(|tag| {
        let (rest, generic) = tag.split_tag();
        (wrap(rest), generic)
    })
}

/// Reads the file's primary tag in its native form. `None` when the format
/// is unknown or the file has no primary tag yet.
fn read_native(path: &Path, options: ParseOptions) -> LoftyResult<Option<(Native, Tag)>> {
    let Some(file_type) = Probe::open(path)?.guess_file_type()?.file_type() else {
        return Ok(None);
    };
    let mut file = File::open(path)?;
    let file = &mut file;

    Ok(match file_type {
        FileType::Mpeg => split(MpegFile::read_from(file, options)?.remove_id3v2(), Native::Id3v2),
        FileType::Wav => split(WavFile::read_from(file, options)?.remove_id3v2(), Native::Id3v2),
        FileType::Aiff => split(AiffFile::read_from(file, options)?.remove_id3v2(), Native::Id3v2),
        FileType::Aac => split(AacFile::read_from(file, options)?.remove_id3v2(), Native::Id3v2),
        FileType::Flac => split(
            FlacFile::read_from(file, options)?.remove_vorbis_comments(),
            Native::VorbisComments,
        ),
        FileType::Opus => split(
            Some(OpusFile::read_from(file, options)?.remove_vorbis_comments()),
            Native::VorbisComments,
        ),
        FileType::Vorbis => split(
            Some(VorbisFile::read_from(file, options)?.remove_vorbis_comments()),
            Native::VorbisComments,
        ),
        FileType::Speex => split(
            Some(SpeexFile::read_from(file, options)?.remove_vorbis_comments()),
            Native::VorbisComments,
        ),
        FileType::Mp4 => split(Mp4File::read_from(file, options)?.remove_ilst(), Native::Ilst),
        FileType::Ape => split(ApeFile::read_from(file, options)?.remove_ape(), Native::Ape),
        FileType::WavPack => split(WavPackFile::read_from(file, options)?.remove_ape(), Native::Ape),
        FileType::Mpc => split(MpcFile::read_from(file, options)?.remove_ape(), Native::Ape),
        _ => None,
    })
}

const fn item_key(field: TagField) -> ItemKey {
    match field {
        TagField::Artist => ItemKey::TrackArtist,
        TagField::AlbumArtist => ItemKey::AlbumArtist,
        TagField::Album => ItemKey::AlbumTitle,
        TagField::Title => ItemKey::TrackTitle,
        TagField::Comment => ItemKey::Comment,
        TagField::DiscNumber => ItemKey::DiscNumber,
        TagField::TrackNumber => ItemKey::TrackNumber,
    }
}

/// Items with a content description (`COMM:iTunNORM` and friends) belong to
/// other tools and are never treated as the field itself.
fn is_field_item(field: TagField, item: &TagItem) -> bool {
    *item.key() == item_key(field) && item.description().is_empty()
}

fn is_alias_item(field: TagField, item: &TagItem) -> bool {
    matches!(item.key(), ItemKey::Unknown(name) if field.is_alias(name))
}

/// Tags of a single file as read by [`LoftyStore`].
pub struct LoftyTags {
    path: PathBuf,
    tag: Tag,
    native: Option<Native>,
}

impl fmt::Debug for LoftyTags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoftyTags")
            .field("path", &self.path)
            .field("tag_type", &self.tag.tag_type())
            .field("items", &self.tag.len())
            .field("native", &self.native.is_some())
            .finish()
    }
}

impl LoftyTags {
    /// Writes the tag into a copy of the file next to it, then renames the
    /// copy over the original so readers never see a half-written file.
    ///
    /// A path reached through a symbolic link is resolved first, so the
    /// link itself stays in place.
    fn write_atomically(&mut self) -> Result<()> {
        let target = fs::canonicalize(&self.path).map_err(|err| Error::tag_write(&self.path, err))?;
        let directory = target.parent().unwrap_or_else(|| Path::new("."));
        let suffix = extension_of(&target)
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();

        let staged = tempfile::Builder::new()
            .prefix(".tagwright-")
            .suffix(&suffix)
            .tempfile_in(directory)
            .map_err(|err| Error::tag_write(&self.path, err))?;

        fs::copy(&target, staged.path()).map_err(|err| Error::tag_write(&self.path, err))?;
        self.save_to(staged.path())
            .map_err(|err| Error::tag_write(&self.path, err))?;
        staged
            .persist(&target)
            .map_err(|err| Error::tag_write(&self.path, err.error))?;
        Ok(())
    }

    fn save_to(&mut self, path: &Path) -> LoftyResult<()> {
        match self.native.take() {
            Some(native) => {
                let (native, saved) = native.save(&self.tag, path);
                self.native = Some(native);
                saved
            }
            None => self.tag.save_to_path(path, WriteOptions::default()),
        }
    }
}

impl TagSet for LoftyTags {
    fn get(&self, field: TagField) -> Option<String> {
        let text = |wanted: fn(TagField, &TagItem) -> bool| {
            self.tag
                .items()
                .filter(|item| wanted(field, item))
                .find_map(|item| item.value().text())
                .map(str::to_owned)
        };
        text(is_field_item).or_else(|| text(is_alias_item))
    }

    fn set(&mut self, field: TagField, value: &str) {
        self.tag.retain(|item| !is_field_item(field, item));
        let _ = self
            .tag
            .push(TagItem::new(item_key(field), ItemValue::Text(value.to_owned())));
    }

    fn delete(&mut self, field: TagField) {
        self.tag
            .retain(|item| !is_field_item(field, item) && !is_alias_item(field, item));
    }

    fn commit(&mut self) -> Result<()> {
        self.write_atomically()?;
        debug!(path = %self.path.display(), "committed tags");
        Ok(())
    }
}
