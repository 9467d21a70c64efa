//! Error types for lodecache
//!
//! Misses and removals of absent keys are not errors; they come back as `None`.

use std::fmt;

/// Result type alias for lodecache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache operations
#[derive(Debug)]
pub enum Error {
    /// Structural misuse, e.g. unlinking a slot that holds no node
    InvalidState(String),

    /// Argument outside the accepted range
    InvalidArgument(String),

    /// A registered listener failed while handling an event
    Listener(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wrap an arbitrary listener failure
    pub fn listener<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Listener(err.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::Listener(e) => write!(f, "Listener failed: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Listener(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}
