//! # lodefile
//!
//! Read-through cache of text file contents on top of lodecache.
//!
//! A miss listener records which paths were not cached; the facade then
//! reads those files as UTF-8 and inserts them before returning.

#![warn(missing_docs)]

mod cache;
mod error;

pub use cache::FileCache;
pub use error::{Error, Result};
pub use lodecache::Strategy;
