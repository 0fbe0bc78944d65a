/*!
 * Lock-Free Scheduler Statistics
 * Uses atomic counters for zero-contention stats tracking in hot scheduling paths
 */

use super::feedback::Migration;
use crate::core::types::Level;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time view of the scheduler counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchedulerStats {
    pub admitted: u64,
    pub slices: u64,
    pub completions: u64,
    /// Completions indexed by the level the job finished from
    pub completions_by_level: Vec<u64>,
    pub demotions: u64,
    pub promotions: u64,
    /// Boost sweeps that moved at least one job
    pub boosts: u64,
    pub boosted_jobs: u64,
    /// Jobs sitting in ready sets at snapshot time
    pub queued: usize,
}

/// Atomic scheduler statistics for lock-free updates
///
/// # Performance
/// - Cache-line aligned to prevent false sharing
/// - All operations use relaxed ordering; counters are for monitoring only
#[repr(C, align(64))]
pub(crate) struct AtomicSchedulerStats {
    admitted: AtomicU64,
    slices: AtomicU64,
    completions: AtomicU64,
    completions_by_level: Box<[AtomicU64]>,
    demotions: AtomicU64,
    promotions: AtomicU64,
    boosts: AtomicU64,
    boosted_jobs: AtomicU64,
}

impl AtomicSchedulerStats {
    pub fn new(num_levels: usize) -> Self {
        Self {
            admitted: AtomicU64::new(0),
            slices: AtomicU64::new(0),
            completions: AtomicU64::new(0),
            completions_by_level: (0..num_levels).map(|_| AtomicU64::new(0)).collect(),
            demotions: AtomicU64::new(0),
            promotions: AtomicU64::new(0),
            boosts: AtomicU64::new(0),
            boosted_jobs: AtomicU64::new(0),
        }
    }

    #[inline(always)]
    pub fn inc_admitted(&self) {
        self.admitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Hot path - called once per executed slice
    #[inline(always)]
    pub fn inc_slices(&self) {
        self.slices.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_completion(&self, level: Level) {
        self.completions.fetch_add(1, Ordering::Relaxed);
        if let Some(counter) = self.completions_by_level.get(level) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn record_migration(&self, migration: Migration) {
        match migration {
            Migration::Promoted => self.promotions.fetch_add(1, Ordering::Relaxed),
            Migration::Demoted => self.demotions.fetch_add(1, Ordering::Relaxed),
            Migration::Stayed => return,
        };
    }

    #[inline]
    pub fn record_boost(&self, moved: usize) {
        if moved == 0 {
            return;
        }
        self.boosts.fetch_add(1, Ordering::Relaxed);
        self.boosted_jobs.fetch_add(moved as u64, Ordering::Relaxed);
    }

    /// Counter values may be slightly inconsistent with each other under
    /// concurrent updates; each individual value is accurate.
    pub fn snapshot(&self, queued: usize) -> SchedulerStats {
        SchedulerStats {
            admitted: self.admitted.load(Ordering::Relaxed),
            slices: self.slices.load(Ordering::Relaxed),
            completions: self.completions.load(Ordering::Relaxed),
            completions_by_level: self
                .completions_by_level
                .iter()
                .map(|c| c.load(Ordering::Relaxed))
                .collect(),
            demotions: self.demotions.load(Ordering::Relaxed),
            promotions: self.promotions.load(Ordering::Relaxed),
            boosts: self.boosts.load(Ordering::Relaxed),
            boosted_jobs: self.boosted_jobs.load(Ordering::Relaxed),
            queued,
        }
    }
}
