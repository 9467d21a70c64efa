//! Summary printed after a run

use std::fmt;
use std::path::PathBuf;

use lodecache::{KeyStatsListener, StatsListener};
use serde::Serialize;

/// Cache statistics gathered over one run
#[derive(Debug, Serialize)]
pub struct Report {
    pub cached_files: usize,
    pub hits: u64,
    pub misses: u64,
    pub updates: u64,
    pub evictions: u64,
    pub hit_ratio: f64,
    pub failures: usize,
    pub top_hit: Vec<String>,
    pub top_missed: Vec<String>,
}

impl Report {
    /// Snapshot the listeners; rankings are cut to the keys actually seen
    pub fn collect(
        stats: &StatsListener,
        keys: &KeyStatsListener<PathBuf>,
        cached_files: usize,
        failures: usize,
        top: usize,
    ) -> lodecache::Result<Self> {
        let top_hit = keys.top_hit_keys(top.min(keys.hit_key_count()))?;
        let top_missed = keys.top_missed_keys(top.min(keys.missed_key_count()))?;

        Ok(Self {
            cached_files,
            hits: stats.hits(),
            misses: stats.misses(),
            updates: stats.updates(),
            evictions: stats.evictions(),
            hit_ratio: stats.hit_ratio(),
            failures,
            top_hit: display_paths(top_hit),
            top_missed: display_paths(top_missed),
        })
    }
}

fn display_paths(paths: Vec<PathBuf>) -> Vec<String> {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect()
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cached files:  {}", self.cached_files)?;
        writeln!(
            f,
            "Hits:          {} ({:.1}%)",
            self.hits,
            self.hit_ratio * 100.0
        )?;
        writeln!(f, "Misses:        {}", self.misses)?;
        writeln!(f, "Updates:       {}", self.updates)?;
        writeln!(f, "Evictions:     {}", self.evictions)?;
        writeln!(f, "Read failures: {}", self.failures)?;

        writeln!(f, "Top hit files:")?;
        for (rank, path) in self.top_hit.iter().enumerate() {
            writeln!(f, "  {}. {}", rank + 1, path)?;
        }
        writeln!(f, "Top missed files:")?;
        for (rank, path) in self.top_missed.iter().enumerate() {
            writeln!(f, "  {}. {}", rank + 1, path)?;
        }
        Ok(())
    }
}
