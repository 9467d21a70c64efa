//! Error types for lodefile

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias for lodefile operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for file cache operations
#[derive(Debug)]
pub enum Error {
    /// Reading a file failed (including invalid UTF-8)
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The cache engine or one of its listeners failed
    Cache(lodecache::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io { path, source } => {
                write!(f, "I/O error reading {}: {}", path.display(), source)
            }
            Error::Cache(e) => write!(f, "Cache error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            Error::Cache(e) => Some(e),
        }
    }
}

impl From<lodecache::Error> for Error {
    fn from(err: lodecache::Error) -> Self {
        Error::Cache(err)
    }
}
