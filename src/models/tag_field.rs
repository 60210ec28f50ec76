// src/models/tag_field.rs
use std::fmt;

/// Logical tag fields the jobs read and write.
///
/// Backends map each field onto their own key. A field may also be stored
/// under legacy alias keys by older tagging tools; lookups must honour those
/// and deletes must remove them together with the canonical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagField {
    Artist,
    AlbumArtist,
    Album,
    Title,
    Comment,
    DiscNumber,
    TrackNumber,
}

impl TagField {
    pub const ALL: [Self; 7] = [
        Self::Artist,
        Self::AlbumArtist,
        Self::Album,
        Self::Title,
        Self::Comment,
        Self::DiscNumber,
        Self::TrackNumber,
    ];

    /// Alternate key spellings for this field, compared case-insensitively.
    #[inline]
    #[must_use]
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Comment => &["COMMENTS"],
            _ => &[],
        }
    }

    #[inline]
    #[must_use]
    pub fn is_alias(self, key: &str) -> bool {
        self.aliases()
            .iter()
            .any(|alias| alias.eq_ignore_ascii_case(key))
    }

    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Artist => "artist",
            Self::AlbumArtist => "album artist",
            Self::Album => "album",
            Self::Title => "title",
            Self::Comment => "comment",
            Self::DiscNumber => "disc number",
            Self::TrackNumber => "track number",
        }
    }
}

impl fmt::Display for TagField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
