/*!
 * Priority Boost
 * Periodic migration of every lower-level job back to level 0
 */

use super::Scheduler;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Rate limiter for the boost sweep
///
/// Time is kept as nanoseconds since `origin` so the last sweep fits in one
/// atomic; a compare-and-swap picks a single winner per interval.
pub(crate) struct BoostClock {
    origin: Instant,
    interval_nanos: u64,
    last_nanos: AtomicU64,
}

impl BoostClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            origin: Instant::now(),
            interval_nanos: u64::try_from(interval.as_nanos()).unwrap_or(u64::MAX),
            last_nanos: AtomicU64::new(0),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_nanos(self.interval_nanos)
    }

    /// Claim the current interval; `true` for exactly one caller per interval
    pub fn try_claim(&self) -> bool {
        let now = u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX);
        let last = self.last_nanos.load(Ordering::Acquire);
        if now.saturating_sub(last) < self.interval_nanos {
            return false;
        }
        self.last_nanos
            .compare_exchange(last, now, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl Scheduler {
    /// Move every job waiting at level 1 and below to level 0
    ///
    /// Cheap to call before every scheduling decision: unless this caller
    /// wins the current boost interval it returns 0 without touching any
    /// queue. Each level is moved in a single critical section, so a job
    /// pushed concurrently is either moved or left in place, never both.
    /// Jobs that do not fit in level 0 stay where they are.
    pub fn boost_sweep(&self) -> usize {
        if self.levels.len() < 2 || !self.boost.try_claim() {
            return 0;
        }
        self.sweep()
    }

    /// Unconditional sweep, bypassing the rate limit
    pub fn force_boost(&self) -> usize {
        if self.levels.len() < 2 {
            return 0;
        }
        self.sweep()
    }

    fn sweep(&self) -> usize {
        let mut moved = 0;
        let mut left = 0;
        for set in &self.levels[1..] {
            // Never blocks: the caller may be the only consumer of either level
            let count = set.transfer_into(&self.levels[0]);
            let remaining = set.len();
            if count > 0 {
                debug!(level = set.level(), jobs = count, "boosting level");
                for _ in 0..count {
                    self.signal.notify_ready();
                }
            }
            moved += count;
            left += remaining;
        }

        if left > 0 && self.levels[0].len() >= self.levels[0].capacity() {
            warn!(moved, left, "level 0 full; boost left jobs in place");
        }
        self.stats.record_boost(moved);
        debug!(moved, "priority boost complete");
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_claim_rate_limited() {
        let clock = BoostClock::new(Duration::from_millis(50));
        // The first interval starts at construction
        assert!(!clock.try_claim());

        thread::sleep(Duration::from_millis(60));
        assert!(clock.try_claim());
        assert!(!clock.try_claim());
    }

    #[test]
    fn test_single_winner_per_interval() {
        let clock = std::sync::Arc::new(BoostClock::new(Duration::from_millis(200)));
        thread::sleep(Duration::from_millis(250));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let clock = clock.clone();
                thread::spawn(move || clock.try_claim())
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&won| won)
            .count();
        assert_eq!(winners, 1);
    }
}
