//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;
use sortviz_core::{Algorithm, ConfigOverrides};

/// Sortviz - Watch sorting algorithms work, one step at a time
#[derive(Parser, Debug)]
#[command(name = "sortviz")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Algorithm to run (e.g. bubble, QuickSort, radix-sort)
    #[arg(short = 'a', long, env = "SORTVIZ_ALGORITHM", value_name = "NAME")]
    pub algorithm: Option<String>,

    /// Number of bars (clamped into the configured range)
    #[arg(short = 'n', long, value_name = "BARS")]
    pub size: Option<usize>,

    /// Wait between two steps, in milliseconds
    #[arg(short = 'd', long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Quiet period before a size change applies, in milliseconds
    #[arg(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// Seed for reproducible inputs
    #[arg(short = 's', long)]
    pub seed: Option<u64>,

    /// Configuration file path
    #[arg(short = 'c', long, env = "SORTVIZ_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Play every algorithm in turn, each on a fresh input
    #[arg(long, conflicts_with = "interactive")]
    pub all: bool,

    /// Read commands from stdin (type `help` for the list)
    #[arg(short = 'i', long)]
    pub interactive: bool,

    /// Print events as JSON lines instead of bars
    #[arg(long)]
    pub json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "SORTVIZ_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Overrides taking precedence over the environment and the config file
    ///
    /// The algorithm is resolved here so an unknown name falls back to bubble
    /// sort once, with a single warning.
    pub fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        if let Some(ms) = self.delay_ms {
            overrides = overrides.with_step_delay_ms(ms);
        }
        if let Some(ms) = self.debounce_ms {
            overrides = overrides.with_debounce_ms(ms);
        }
        if let Some(bars) = self.size {
            overrides = overrides.with_initial_bars(bars);
        }
        if let Some(seed) = self.seed {
            overrides = overrides.with_seed(seed);
        }
        if let Some(ref name) = self.algorithm {
            overrides = overrides.with_algorithm(Algorithm::from_name_or_default(name));
        }
        overrides
    }
}
