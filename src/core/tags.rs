// src/core/tags.rs
pub mod lofty_store;

pub use lofty_store::{LoftyStore, LoftyTags};

use crate::error::Result;
use crate::models::TagField;
use std::path::Path;

/// In-memory view of one file's tags.
///
/// Edits stay pending until [`TagSet::commit`] writes them back. Lookups
/// check a field's canonical key first and then its legacy aliases, and
/// [`TagSet::delete`] removes all of them.
pub trait TagSet {
    /// The stored value, or `None` if the field is absent. An empty value is
    /// still `Some("")`.
    fn get(&self, field: TagField) -> Option<String>;

    fn has(&self, field: TagField) -> bool {
        self.get(field).is_some()
    }

    fn set(&mut self, field: TagField, value: &str);

    fn delete(&mut self, field: TagField);

    /// Persists every pending change to the underlying file, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TagWrite`] if the file could not be rewritten.
    fn commit(&mut self) -> Result<()>;
}

/// Loads [`TagSet`]s from files on disk.
pub trait TagStore: Send + Sync {
    type Tags: TagSet;

    /// # Errors
    ///
    /// Returns [`crate::Error::TagRead`] if the file cannot be opened or its
    /// tags cannot be parsed.
    fn load(&self, path: &Path) -> Result<Self::Tags>;
}
