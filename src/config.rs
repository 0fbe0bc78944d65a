/*!
 * Scheduler Configuration
 *
 * Startup-only configuration. Levels and quanta are fixed for the lifetime
 * of a run; `validate` must succeed before any thread is spawned.
 */

use crate::core::errors::{ConfigError, ConfigResult};
use crate::core::limits::{
    DEFAULT_BOOST_INTERVAL, DEFAULT_CAPACITY, DEFAULT_COST_MAX, DEFAULT_COST_MIN,
    DEFAULT_IO_BURST, DEFAULT_QUANTA, DEFAULT_SLICE_UNIT, DEFAULT_WORKERS, MAX_CAPACITY,
    MAX_LEVELS, MAX_WORKERS,
};
use crate::core::types::Cost;
use crate::report::OutputFormat;
use crate::scheduler::SelectionPolicy;
use serde::Serialize;
use std::time::Duration;

/// Queue-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchedulerConfig {
    /// Quantum per level; the number of levels is `quanta.len()`
    pub quanta: Vec<Cost>,
    /// Ready-set capacity per level
    pub capacity: usize,
    /// Wall time between priority boosts
    pub boost_interval: Duration,
    /// Which job `try_pop` removes within a level
    pub policy: SelectionPolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            quanta: DEFAULT_QUANTA.to_vec(),
            capacity: DEFAULT_CAPACITY,
            boost_interval: DEFAULT_BOOST_INTERVAL,
            policy: SelectionPolicy::default(),
        }
    }
}

impl SchedulerConfig {
    pub fn num_levels(&self) -> usize {
        self.quanta.len()
    }

    pub fn with_quanta(mut self, quanta: impl Into<Vec<Cost>>) -> Self {
        self.quanta = quanta.into();
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_boost_interval(mut self, interval: Duration) -> Self {
        self.boost_interval = interval;
        self
    }

    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.quanta.is_empty() {
            return Err(ConfigError::EmptyQuanta);
        }
        if self.quanta.len() > MAX_LEVELS {
            return Err(ConfigError::TooManyLevels {
                levels: self.quanta.len(),
                max: MAX_LEVELS,
            });
        }
        if let Some(level) = self.quanta.iter().position(|&q| q == 0) {
            return Err(ConfigError::ZeroQuantum { level });
        }
        for (level, pair) in self.quanta.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(ConfigError::QuantaNotIncreasing {
                    level: level + 1,
                    quantum: pair[1],
                    previous: pair[0],
                });
            }
        }
        if self.capacity == 0 || self.capacity > MAX_CAPACITY {
            return Err(ConfigError::InvalidCapacity {
                capacity: self.capacity,
                max: MAX_CAPACITY,
            });
        }
        if self.boost_interval.is_zero() {
            return Err(ConfigError::ZeroBoostInterval);
        }
        Ok(())
    }
}

/// Worker pool configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerConfig {
    pub workers: usize,
    /// Wall time per simulated unit; zero executes slices instantly
    pub slice_unit: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            slice_unit: DEFAULT_SLICE_UNIT,
        }
    }
}

impl WorkerConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.workers == 0 || self.workers > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                workers: self.workers,
                max: MAX_WORKERS,
            });
        }
        Ok(())
    }
}

/// Ingestion configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestConfig {
    pub cost_min: Cost,
    pub cost_max: Cost,
    /// Seed for reproducible cost sampling
    pub seed: Option<u64>,
    /// Probability that an admitted job is I/O-bound
    pub io_ratio: f64,
    /// Units an I/O-bound job runs before yielding
    pub io_burst: Cost,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            cost_min: DEFAULT_COST_MIN,
            cost_max: DEFAULT_COST_MAX,
            seed: None,
            io_ratio: 0.0,
            io_burst: DEFAULT_IO_BURST,
        }
    }
}

impl IngestConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.cost_min == 0 || self.cost_min > self.cost_max {
            return Err(ConfigError::InvalidCostRange {
                min: self.cost_min,
                max: self.cost_max,
            });
        }
        if !(0.0..=1.0).contains(&self.io_ratio) {
            return Err(ConfigError::InvalidIoRatio(self.io_ratio.to_string()));
        }
        if self.io_burst == 0 {
            return Err(ConfigError::ZeroIoBurst);
        }
        Ok(())
    }
}

/// Complete run configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MlfqConfig {
    pub scheduler: SchedulerConfig,
    pub workers: WorkerConfig,
    pub ingest: IngestConfig,
    pub format: OutputFormat,
}

impl MlfqConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        self.scheduler.validate()?;
        self.workers.validate()?;
        self.ingest.validate()
    }
}
