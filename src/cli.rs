/*!
 * Command Line
 * Flags with environment fallbacks, mapped onto `MlfqConfig`
 */

use crate::config::{IngestConfig, MlfqConfig, SchedulerConfig, WorkerConfig};
use crate::core::limits::{
    DEFAULT_CAPACITY, DEFAULT_COST_MAX, DEFAULT_COST_MIN, DEFAULT_IO_BURST, DEFAULT_WORKERS,
};
use crate::core::types::Cost;
use crate::report::OutputFormat;
use crate::scheduler::SelectionPolicy;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Simulated multi-level feedback queue scheduler
///
/// Reads one job per line from stdin (or --input) and prints one line per
/// finished job.
#[derive(Debug, Parser)]
#[command(name = "mlfq", version, about)]
pub struct Cli {
    /// Read jobs from this file instead of stdin
    #[arg(short, long, env = "MLFQ_INPUT")]
    pub input: Option<PathBuf>,

    /// Per-level quanta, highest priority first (strictly increasing)
    #[arg(long, env = "MLFQ_QUANTA", value_delimiter = ',', default_value = "5,10,20")]
    pub quanta: Vec<Cost>,

    /// Ready-set capacity per level
    #[arg(long, env = "MLFQ_CAPACITY", default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,

    /// Worker threads
    #[arg(short, long, env = "MLFQ_WORKERS", default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Milliseconds between priority boosts
    #[arg(long, env = "MLFQ_BOOST_MS", default_value_t = 200)]
    pub boost_ms: u64,

    /// Wall-clock milliseconds per simulated work unit (0 runs instantly)
    #[arg(long, env = "MLFQ_SLICE_UNIT_MS", default_value_t = 1)]
    pub slice_unit_ms: u64,

    /// Which job a level hands out first
    #[arg(long, env = "MLFQ_POLICY", value_enum, default_value_t = SelectionPolicy::Lifo)]
    pub policy: SelectionPolicy,

    /// Minimum sampled job cost
    #[arg(long, env = "MLFQ_COST_MIN", default_value_t = DEFAULT_COST_MIN)]
    pub cost_min: Cost,

    /// Maximum sampled job cost (inclusive)
    #[arg(long, env = "MLFQ_COST_MAX", default_value_t = DEFAULT_COST_MAX)]
    pub cost_max: Cost,

    /// Seed for reproducible cost sampling
    #[arg(long, env = "MLFQ_SEED")]
    pub seed: Option<u64>,

    /// Fraction of jobs that are I/O-bound (0.0 - 1.0)
    #[arg(long, env = "MLFQ_IO_RATIO", default_value_t = 0.0)]
    pub io_ratio: f64,

    /// Units an I/O-bound job runs before yielding the CPU
    #[arg(long, env = "MLFQ_IO_BURST", default_value_t = DEFAULT_IO_BURST)]
    pub io_burst: Cost,

    /// Completion line format
    #[arg(long, env = "MLFQ_FORMAT", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl Cli {
    /// Build the run configuration; validation happens in `Runtime::new`
    pub fn to_config(&self) -> MlfqConfig {
        MlfqConfig {
            scheduler: SchedulerConfig {
                quanta: self.quanta.clone(),
                capacity: self.capacity,
                boost_interval: Duration::from_millis(self.boost_ms),
                policy: self.policy,
            },
            workers: WorkerConfig {
                workers: self.workers,
                slice_unit: Duration::from_millis(self.slice_unit_ms),
            },
            ingest: IngestConfig {
                cost_min: self.cost_min,
                cost_max: self.cost_max,
                seed: self.seed,
                io_ratio: self.io_ratio,
                io_burst: self.io_burst,
            },
            format: self.format,
        }
    }
}
