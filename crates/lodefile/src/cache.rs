//! FileCache: read-through cache of file contents

use std::fs;
use std::mem;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use lodecache::{CacheBuilder, CacheListener, DynCache, Strategy};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Records every path the cache missed so the facade can load it
#[derive(Debug, Default)]
struct PendingLoads {
    paths: Mutex<Vec<PathBuf>>,
}

impl PendingLoads {
    fn take(&self) -> Vec<PathBuf> {
        mem::take(&mut *self.paths.lock())
    }
}

impl CacheListener<PathBuf, String> for PendingLoads {
    fn on_miss(&self, key: &PathBuf) -> lodecache::Result<()> {
        self.paths.lock().push(key.clone());
        Ok(())
    }
}

/// Cache mapping file paths to their UTF-8 contents
///
/// A miss is populated from the filesystem while the cache lock is held, so
/// concurrent readers of the same path wait for the load instead of polling.
pub struct FileCache {
    /// Cache of path -> contents
    cache: Mutex<DynCache<PathBuf, String>>,

    /// Paths missed by the last lookup
    pending: Arc<PendingLoads>,
}

impl FileCache {
    /// Create a cache holding at most `capacity` files
    ///
    /// # Arguments
    /// * `strategy` - Which file to drop when full
    /// * `capacity` - Maximum number of cached files
    pub fn with_capacity(strategy: Strategy, capacity: usize) -> Self {
        Self::from_builder(CacheBuilder::with_capacity(strategy, capacity))
    }

    /// Create a cache that forgets files `max_age` after they were loaded
    ///
    /// # Arguments
    /// * `max_age` - Time after which a cached file is read again
    pub fn with_expiration(max_age: Duration) -> Self {
        Self::from_builder(CacheBuilder::with_expiration(max_age))
    }

    /// Create a cache from a configured builder
    ///
    /// Listeners registered on the builder are notified before the loader.
    pub fn from_builder(builder: CacheBuilder<PathBuf, String>) -> Self {
        let pending = Arc::new(PendingLoads::default());
        let mut cache = builder.build();
        cache.add_listener(pending.clone());

        Self {
            cache: Mutex::new(cache),
            pending,
        }
    }

    /// Get the contents of a file, reading it on a miss
    ///
    /// # Arguments
    /// * `path` - File to read
    ///
    /// # Returns
    /// * `Result<String>` - File contents
    pub fn get_file_contents<P: AsRef<Path>>(&self, path: P) -> Result<String> {
        let path = path.as_ref().to_path_buf();
        let mut cache = self.cache.lock();

        // Drain before inspecting the lookup so a failed call leaves nothing
        // pending for the next one
        let lookup = cache.get(&path).map(|hit| hit.cloned());
        let pending = self.pending.take();
        if let Some(contents) = lookup? {
            return Ok(contents);
        }

        // Cache miss - load everything the listener recorded
        let mut requested = None;
        for missed in pending {
            match read_file(&missed) {
                Ok(contents) => {
                    if missed == path {
                        requested = Some(contents.clone());
                    }
                    cache.put(missed, contents)?;
                }
                Err(err) if missed == path => return Err(err),
                Err(_) => {} // logged by read_file, retried on its next miss
            }
        }

        // The loader listener records every miss, and a failing listener
        // already returned above
        requested.ok_or_else(|| {
            Error::Cache(lodecache::Error::InvalidState(format!(
                "miss for {} was not recorded",
                path.display()
            )))
        })
    }

    /// Insert or replace the cached contents of a file
    ///
    /// # Arguments
    /// * `path` - File the contents belong to
    /// * `contents` - Contents to serve for `path`
    pub fn put_file_contents<P: AsRef<Path>>(&self, path: P, contents: String) -> Result<()> {
        let mut cache = self.cache.lock();
        cache.put(path.as_ref().to_path_buf(), contents)?;
        Ok(())
    }

    /// Register a listener for cache events
    pub fn add_listener(&self, listener: Arc<dyn CacheListener<PathBuf, String>>) {
        self.cache.lock().add_listener(listener);
    }

    /// Check if a file is cached, without notifying listeners
    pub fn contains<P: AsRef<Path>>(&self, path: P) -> bool {
        self.cache.lock().contains(&path.as_ref().to_path_buf())
    }

    /// Get the number of cached files
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Check if no file is cached
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Drop every cached file
    pub fn clear(&self) {
        self.cache.lock().clear();
    }
}

fn read_file(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            debug!(path = %path.display(), bytes = contents.len(), "Loaded file into cache");
            Ok(contents)
        }
        Err(source) => {
            warn!(path = %path.display(), error = %source, "Failed to load file");
            Err(Error::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}
