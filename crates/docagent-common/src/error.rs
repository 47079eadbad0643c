//! Error types for document ingestion

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Errors raised while listing or reading input files.
///
/// The first four variants are precondition failures detected before any
/// work is done; each carries the offending path.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Input directory '{}' was not found.", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("'{}' is not a directory.", .0.display())]
    NotADirectory(PathBuf),

    #[error("File '{}' does not exist.", .0.display())]
    FileNotFound(PathBuf),

    #[error("'{}' is not a file.", .0.display())]
    NotAFile(PathBuf),

    #[error("IO error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IngestError {
    /// Wrap an IO error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors about the input directory itself rather than a file in it
    pub fn is_directory_error(&self) -> bool {
        matches!(self, Self::DirectoryNotFound(_) | Self::NotADirectory(_))
    }

    /// The path this error refers to
    pub fn path(&self) -> &Path {
        match self {
            Self::DirectoryNotFound(path)
            | Self::NotADirectory(path)
            | Self::FileNotFound(path)
            | Self::NotAFile(path)
            | Self::Io { path, .. } => path,
        }
    }
}
