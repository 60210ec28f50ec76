// src/core/scanner/exclude.rs
use crate::error::{Error, Result};
use glob::Pattern;
use std::path::Path;

#[derive(Debug, Clone)]
struct Rule {
    pattern: Pattern,
    is_negation: bool,
    directories_only: bool,
}

/// Glob patterns for entries the scanner should skip.
///
/// A pattern matches against the entry's file name and against its path
/// relative to the scan root, so `Live*` and `Bootlegs/*/demo.mp3` both work.
/// A trailing `/` restricts a pattern to directories and a leading `!`
/// re-includes entries an earlier pattern excluded.
#[derive(Debug, Default, Clone)]
pub struct ExcludePatterns {
    rules: Vec<Rule>,
}

impl ExcludePatterns {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Parses a comma-separated pattern list. Blank entries are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if any pattern is not valid glob syntax.
    pub fn from_list(list: &str) -> Result<Self> {
        let mut patterns = Self::new();
        for pattern in list.split(',') {
            patterns.add_pattern(pattern)?;
        }
        Ok(patterns)
    }

    /// Adds one pattern. Empty strings and `#` comments are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the pattern is not valid glob syntax.
    pub fn add_pattern(&mut self, pattern: &str) -> Result<()> {
        let pattern = pattern.trim();
        if pattern.is_empty() || pattern.starts_with('#') {
            return Ok(());
        }

        let (pattern, is_negation) = pattern
            .strip_prefix('!')
            .map_or((pattern, false), |stripped| (stripped, true));
        let (pattern, directories_only) = pattern
            .strip_suffix('/')
            .map_or((pattern, false), |stripped| (stripped, true));

        let compiled = Pattern::new(pattern).map_err(|err| {
            Error::InvalidArgument(format!("invalid exclude pattern {pattern:?}: {err}"))
        })?;
        self.rules.push(Rule {
            pattern: compiled,
            is_negation,
            directories_only,
        });
        Ok(())
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether `path` (somewhere under `root`) is excluded.
    #[must_use]
    pub fn matches(&self, path: &Path, root: &Path, is_dir: bool) -> bool {
        let relative = path.strip_prefix(root).unwrap_or(path);
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();

        let mut excluded = false;
        for rule in &self.rules {
            if rule.directories_only && !is_dir {
                continue;
            }
            if rule.pattern.matches(&file_name) || rule.pattern.matches_path(relative) {
                excluded = !rule.is_negation;
            }
        }
        excluded
    }
}
