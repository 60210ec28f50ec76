// src/core/scanner.rs
pub mod exclude;
pub mod filter;

pub use exclude::ExcludePatterns;
pub use filter::PathFilter;

use crate::error::{Error, Result};
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Recursively collects the files under a root that pass a [`PathFilter`].
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    filter: PathFilter,
    excludes: ExcludePatterns,
}

impl DirectoryScanner {
    #[inline]
    #[must_use]
    pub const fn new(filter: PathFilter) -> Self {
        Self {
            filter,
            excludes: ExcludePatterns::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_excludes(mut self, excludes: ExcludePatterns) -> Self {
        self.excludes = excludes;
        self
    }

    /// Walks `root` and returns every matching regular file.
    ///
    /// # Arguments
    ///
    /// * `root` - The directory to scan. Relative paths are resolved against
    ///   the current directory.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<PathBuf>)` - Absolute paths in depth-first order, entries of
    ///   each directory sorted by name. A file reachable through several
    ///   symbolic links is listed once.
    ///
    /// # Errors
    ///
    /// This function may return an error if:
    /// * `root` is not a directory ([`Error::InvalidArgument`])
    /// * The current directory cannot be determined for a relative root
    ///
    /// Unreadable subdirectories and symbolic link cycles are skipped with a
    /// warning rather than failing the scan.
    pub fn scan(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let absolute_root = if root.is_absolute() {
            root.to_path_buf()
        } else {
            env::current_dir()?.join(root)
        };

        if !absolute_root.is_dir() {
            return Err(Error::InvalidArgument(format!(
                "{} is not a directory",
                absolute_root.display()
            )));
        }

        let mut seen = HashSet::new();
        let mut files = Vec::new();

        for entry in WalkDir::new(&absolute_root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| self.should_visit(e, &absolute_root))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    if let Some(ancestor) = err.loop_ancestor() {
                        warn!(
                            path = ?err.path(),
                            ancestor = %ancestor.display(),
                            "skipping symbolic link cycle"
                        );
                    } else {
                        warn!(error = %err, "skipping unreadable entry");
                    }
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let identity =
                fs::canonicalize(entry.path()).unwrap_or_else(|_| entry.path().to_path_buf());
            if seen.insert(identity) {
                files.push(entry.into_path());
            } else {
                debug!(path = %entry.path().display(), "already reached through another link");
            }
        }

        debug!(
            root = %absolute_root.display(),
            count = files.len(),
            "scan complete"
        );
        Ok(files)
    }

    fn should_visit(&self, entry: &walkdir::DirEntry, root: &Path) -> bool {
        if entry.depth() == 0 {
            return true;
        }
        let is_dir = entry.file_type().is_dir();
        self.filter.accepts(entry) && !self.excludes.matches(entry.path(), root, is_dir)
    }
}

/// Scans `root` for files with any of `extensions`.
///
/// # Errors
///
/// This function may return an error if:
/// * The extension list is empty
/// * `root` is not a directory
pub fn scan_directory(root: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    DirectoryScanner::new(PathFilter::new(extensions)?).scan(root)
}
