/*!
 * Core Types
 * Common types used across the scheduler
 */

use super::errors::{SchedResult, SchedulerError};
use std::fmt;
use std::time::{Duration, Instant};

/// Job ID type (monotonic, starts at 1)
pub type JobId = u64;

/// Queue level index (0 is the highest priority)
pub type Level = usize;

/// Simulated work units
pub type Cost = u32;

/// Priority hint (1-100, higher is more important)
pub type Priority = u8;

/// A unit of simulated work
///
/// Identity (`id`, `payload`, `priority_hint`) is fixed at admission. Only the
/// worker currently holding the job mutates its cost accounting.
#[derive(Clone)]
pub struct Job {
    id: JobId,
    payload: Vec<u8>,
    priority_hint: Priority,
    remaining_cost: Cost,
    total_cost: Cost,
    slices: u32,
    io_burst: Option<Cost>,
    admitted_at: Instant,
}

impl Job {
    /// Create a job with a strictly positive cost
    pub fn new(
        id: JobId,
        payload: impl Into<Vec<u8>>,
        priority_hint: Priority,
        cost: Cost,
    ) -> SchedResult<Self> {
        if cost == 0 {
            return Err(SchedulerError::InvalidCost(id));
        }

        Ok(Self {
            id,
            payload: payload.into(),
            priority_hint,
            remaining_cost: cost,
            total_cost: cost,
            slices: 0,
            io_burst: None,
            admitted_at: Instant::now(),
        })
    }

    /// Mark the job as I/O-bound: it gives up the CPU after `burst` units
    pub fn with_io_burst(mut self, burst: Cost) -> Self {
        self.io_burst = (burst > 0).then_some(burst);
        self
    }

    #[inline]
    pub fn id(&self) -> JobId {
        self.id
    }

    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    #[inline]
    pub fn priority_hint(&self) -> Priority {
        self.priority_hint
    }

    #[inline]
    pub fn remaining_cost(&self) -> Cost {
        self.remaining_cost
    }

    #[inline]
    pub fn total_cost(&self) -> Cost {
        self.total_cost
    }

    #[inline]
    pub fn slices(&self) -> u32 {
        self.slices
    }

    #[inline]
    pub fn io_burst(&self) -> Option<Cost> {
        self.io_burst
    }

    /// Time since admission
    pub fn turnaround(&self) -> Duration {
        self.admitted_at.elapsed()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.remaining_cost == 0
    }

    /// Deduct one executed slice, returning the units actually deducted
    ///
    /// Saturates at the remaining cost so the counter never underflows.
    pub fn consume(&mut self, units: Cost) -> Cost {
        let deducted = units.min(self.remaining_cost);
        self.remaining_cost -= deducted;
        self.slices += 1;
        deducted
    }
}

// Payloads can be large and binary; print the length only
impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("id", &self.id)
            .field("payload_len", &self.payload.len())
            .field("priority_hint", &self.priority_hint)
            .field("remaining_cost", &self.remaining_cost)
            .field("total_cost", &self.total_cost)
            .field("slices", &self.slices)
            .field("io_burst", &self.io_burst)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_cost_rejected() {
        let err = Job::new(7, "x", 1, 0).unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidCost(7)));
    }

    #[test]
    fn test_consume_saturates() {
        let mut job = Job::new(1, "payload", 10, 12).unwrap();

        assert_eq!(job.consume(5), 5);
        assert_eq!(job.remaining_cost(), 7);
        assert!(!job.is_complete());

        assert_eq!(job.consume(10), 7);
        assert_eq!(job.remaining_cost(), 0);
        assert!(job.is_complete());
        assert_eq!(job.slices(), 2);
        assert_eq!(job.total_cost(), 12);
    }

    #[test]
    fn test_io_burst_zero_is_cpu_bound() {
        let job = Job::new(1, "a", 1, 3).unwrap().with_io_burst(0);
        assert_eq!(job.io_burst(), None);

        let job = Job::new(2, "b", 1, 3).unwrap().with_io_burst(2);
        assert_eq!(job.io_burst(), Some(2));
    }
}
