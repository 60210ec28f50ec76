// src/core/scanner/filter.rs
use crate::error::{Error, Result};
use std::collections::HashSet;
use std::path::Path;

/// Accepts directories and files whose extension is in a fixed set.
///
/// Extensions are compared case-insensitively. A file's extension is the
/// text after the final `.` of its name, so `.mp3` counts as an `mp3` file
/// and `README` has no extension at all.
#[derive(Debug, Clone)]
pub struct PathFilter {
    extensions: HashSet<String>,
}

impl PathFilter {
    /// Builds a filter from a list of extensions such as `["mp3", ".FLAC"]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the list is empty or any entry is
    /// blank once the leading dot is removed.
    pub fn new<I, S>(extensions: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized = HashSet::new();
        for extension in extensions {
            let extension = extension.as_ref().trim();
            let extension = extension.strip_prefix('.').unwrap_or(extension);
            if extension.is_empty() {
                return Err(Error::InvalidArgument(String::from(
                    "extension list contains an empty entry",
                )));
            }
            normalized.insert(extension.to_lowercase());
        }

        if normalized.is_empty() {
            return Err(Error::InvalidArgument(String::from(
                "at least one extension is required",
            )));
        }

        Ok(Self {
            extensions: normalized,
        })
    }

    /// Parses a comma-separated list such as `"mp3,flac"`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PathFilter::new`].
    pub fn from_list(list: &str) -> Result<Self> {
        Self::new(list.split(',').filter(|ext| !ext.trim().is_empty()))
    }

    #[inline]
    #[must_use]
    pub fn accepts(&self, entry: &walkdir::DirEntry) -> bool {
        self.accepts_path(entry.path(), entry.file_type().is_dir())
    }

    #[must_use]
    pub fn accepts_path(&self, path: &Path, is_dir: bool) -> bool {
        if is_dir {
            return true;
        }
        extension_of(path).is_some_and(|ext| self.extensions.contains(&ext.to_lowercase()))
    }

    #[must_use]
    pub fn extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.extensions.iter().map(String::as_str).collect();
        extensions.sort_unstable();
        extensions
    }
}

/// Text after the final `.` of the file name, verbatim.
pub(crate) fn extension_of(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    name.rfind('.').and_then(|dot| name.get(dot.saturating_add(1)..))
}
