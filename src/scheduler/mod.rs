/*!
 * MLFQ Scheduler
 *
 * Owns every level's ready set, the cross-level ready signal, the boost
 * clock and the statistics. Handles are cheap to clone and share state, so
 * ingestion and every worker hold their own `Scheduler`.
 *
 * # Locking
 *
 * Two lock domains: one mutex per ready set, and the ready-signal mutex.
 * Only `push` and `next_runnable` touch both, and they always release the
 * ready-set lock before taking the signal lock. The boost sweep is the only
 * code holding two ready-set locks, always a lower level before level 0.
 */

use crate::config::SchedulerConfig;
use crate::core::errors::MlfqResult;
use crate::core::types::{Cost, Job, Level};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod atomic_stats;
mod boost;
pub mod feedback;
mod operations;
mod policy;
mod ready_set;
mod signal;

pub use atomic_stats::SchedulerStats;
pub use feedback::Migration;
pub use policy::SelectionPolicy;
pub use ready_set::ReadySet;

use atomic_stats::AtomicSchedulerStats;
use boost::BoostClock;
use signal::ReadySignal;

/// A job handed to a worker, tagged with the level it was popped from
#[derive(Debug)]
pub struct Dispatch {
    pub job: Job,
    pub level: Level,
    /// Quantum of `level`
    pub quantum: Cost,
}

/// Result of `Scheduler::try_requeue`
#[derive(Debug)]
pub enum Requeue {
    /// Pushed onto this level
    Queued(Level),
    /// Target level was full; the caller keeps the job, already migrated
    Retained(Dispatch),
}

/// Multi-level feedback queue
pub struct Scheduler {
    levels: Arc<[ReadySet]>,
    quanta: Arc<[Cost]>,
    signal: Arc<ReadySignal>,
    boost: Arc<BoostClock>,
    stats: Arc<AtomicSchedulerStats>,
}

impl Scheduler {
    /// Validate the configuration and allocate every level up front
    pub fn new(config: &SchedulerConfig) -> MlfqResult<Self> {
        config.validate()?;

        let levels = (0..config.num_levels())
            .map(|level| ReadySet::new(level, config.capacity, config.policy))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            levels = levels.len(),
            quanta = ?config.quanta,
            capacity = config.capacity,
            boost_interval = ?config.boost_interval,
            policy = ?config.policy,
            "Scheduler initialized"
        );

        Ok(Self {
            levels: levels.into(),
            quanta: config.quanta.clone().into(),
            signal: Arc::new(ReadySignal::new()),
            boost: Arc::new(BoostClock::new(config.boost_interval)),
            stats: Arc::new(AtomicSchedulerStats::new(config.quanta.len())),
        })
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Quantum of `level`, if the level exists
    pub fn quantum(&self, level: Level) -> Option<Cost> {
        self.quanta.get(level).copied()
    }

    pub fn boost_interval(&self) -> Duration {
        self.boost.interval()
    }

    /// Jobs waiting at `level`, if the level exists
    pub fn level_len(&self, level: Level) -> Option<usize> {
        self.levels.get(level).map(ReadySet::len)
    }

    /// Jobs waiting across all levels (in-flight jobs excluded)
    pub fn len(&self) -> usize {
        self.levels.iter().map(ReadySet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(ReadySet::is_empty)
    }

    pub fn is_running(&self) -> bool {
        self.signal.is_running()
    }

    /// Lock-free snapshot of the counters
    pub fn stats(&self) -> SchedulerStats {
        self.stats.snapshot(self.len())
    }
}

impl Clone for Scheduler {
    fn clone(&self) -> Self {
        Self {
            levels: Arc::clone(&self.levels),
            quanta: Arc::clone(&self.quanta),
            signal: Arc::clone(&self.signal),
            boost: Arc::clone(&self.boost),
            stats: Arc::clone(&self.stats),
        }
    }
}
