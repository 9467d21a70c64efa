//! Lodecache CLI - read files through a cache and report statistics

mod report;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use lodecache::{CacheBuilder, KeyStatsListener, StatsListener, Strategy};
use lodefile::FileCache;
use tracing::{info, warn};

use crate::report::Report;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    Fifo,
    Lru,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Fifo => Strategy::Fifo,
            StrategyArg::Lru => Strategy::Lru,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Files to read through the cache
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Eviction strategy for a capacity-bounded cache
    #[arg(short, long, value_enum, default_value_t = StrategyArg::Lru)]
    strategy: StrategyArg,

    /// Cache capacity (number of files)
    #[arg(short, long, default_value_t = 16, conflicts_with = "ttl_ms")]
    capacity: usize,

    /// Expire cached files after this many milliseconds instead of bounding by count
    #[arg(long)]
    ttl_ms: Option<u64>,

    /// How many times to read the whole file list
    #[arg(short, long, default_value_t = 2)]
    rounds: usize,

    /// Number of keys to list in each top-N ranking
    #[arg(short, long, default_value_t = 3)]
    top: usize,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if args.rounds == 0 {
        bail!("--rounds must be at least 1");
    }

    info!("Starting lodectl v{}", env!("CARGO_PKG_VERSION"));

    let builder = match args.ttl_ms {
        Some(ttl) => {
            info!("Cache expiration: {} ms", ttl);
            CacheBuilder::with_expiration(Duration::from_millis(ttl))
        }
        None => {
            let strategy = Strategy::from(args.strategy);
            info!("Cache strategy: {}, capacity: {}", strategy, args.capacity);
            CacheBuilder::with_capacity(strategy, args.capacity)
        }
    };

    let stats = Arc::new(StatsListener::new());
    let keys = Arc::new(KeyStatsListener::<PathBuf>::new());
    let cache = FileCache::from_builder(builder.listener(stats.clone()).listener(keys.clone()));

    let mut failures = 0;
    for round in 1..=args.rounds {
        for path in &args.files {
            match cache.get_file_contents(path) {
                Ok(contents) => {
                    info!(round, path = %path.display(), bytes = contents.len(), "Read file")
                }
                Err(e) => {
                    warn!("Error reading {}: {}", path.display(), e);
                    failures += 1;
                }
            }
        }
    }

    let report = Report::collect(&stats, &keys, cache.len(), failures, args.top)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }

    Ok(())
}
