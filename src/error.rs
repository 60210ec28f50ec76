// src/error.rs
use crate::models::TagField;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Boxed source error for failures raised by a tag backend.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by the scanner, the tag layer and the jobs.
///
/// Only [`Error::InvalidArgument`] is fatal to a job run. Everything else is
/// scoped to a single file and gets logged by the job before it moves on.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad construction parameters or an invalid scan root.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("tags could not be read from {}", .path.display())]
    TagRead {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("tags could not be written to {}", .path.display())]
    TagWrite {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("could not copy {} to {}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A tag value that cannot be turned into a number or a path component.
    #[error("{field} value {value:?} is not usable")]
    Format { field: TagField, value: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn tag_read(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        Self::TagRead {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn tag_write(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        Self::TagWrite {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Whether this error should abort a whole run rather than a single file.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
