//! Error types of the migration pipeline.

use std::path::PathBuf;

use crate::cst::CstError;
use crate::fix::RewriteError;

/// Failure while transforming one source text.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// The source is not valid PHP.
    #[error(transparent)]
    Parse(#[from] CstError),
    /// The printer produced edits it could not apply.
    #[error(transparent)]
    Print(#[from] RewriteError),
}

/// Failure while migrating files on disk.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// The file is not UTF-8.
    #[error("{} is not valid UTF-8", path.display())]
    NotUtf8 {
        /// Offending file
        path: PathBuf,
    },
    /// The file does not parse.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// Offending file
        path: PathBuf,
        /// Parser error
        #[source]
        source: CstError,
    },
    /// The file parsed but could not be printed back.
    #[error("failed to print {}: {source}", path.display())]
    Print {
        /// Offending file
        path: PathBuf,
        /// Rewriter error
        #[source]
        source: RewriteError,
    },
    /// An `--exclude` or configured pattern is not a valid glob.
    #[error("invalid exclude pattern `{pattern}`: {source}")]
    InvalidGlob {
        /// The pattern as given
        pattern: String,
        /// Glob compiler error
        #[source]
        source: globset::Error,
    },
}

impl MigrateError {
    /// Attach `path` to a transformation failure.
    #[must_use]
    pub fn from_transform(path: impl Into<PathBuf>, err: TransformError) -> Self {
        let path = path.into();
        match err {
            TransformError::Parse(source) => Self::Parse { path, source },
            TransformError::Print(source) => Self::Print { path, source },
        }
    }
}
