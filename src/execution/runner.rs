/*!
 * Slice Runners
 * Simulated execution of one scheduling turn
 */

use crate::core::types::{Cost, Job};
use std::thread;
use std::time::Duration;

/// Executes one slice of a job
///
/// Implementations must be thread-safe: every worker shares one runner.
pub trait SliceRunner: Send + Sync {
    /// Run `job` for at most `budget` units and return the units consumed
    ///
    /// Returning less than `budget` means the job gave the CPU up early
    /// (for example to wait on I/O). The worker clamps the result to
    /// `1..=budget`.
    fn run(&self, job: &Job, budget: Cost) -> Cost;

    /// Runner name for logging
    fn name(&self) -> &'static str;
}

/// Units a job actually runs before finishing or blocking on I/O
#[inline]
pub fn units_before_yield(job: &Job, budget: Cost) -> Cost {
    job.io_burst().map_or(budget, |burst| burst.min(budget))
}

/// Blocks the worker for `unit` of wall time per consumed unit
#[derive(Debug, Clone, Copy)]
pub struct TimedRunner {
    unit: Duration,
}

impl TimedRunner {
    pub fn new(unit: Duration) -> Self {
        Self { unit }
    }
}

impl SliceRunner for TimedRunner {
    fn run(&self, job: &Job, budget: Cost) -> Cost {
        let units = units_before_yield(job, budget);
        if !self.unit.is_zero() {
            thread::sleep(self.unit.saturating_mul(units));
        }
        units
    }

    fn name(&self) -> &'static str {
        "timed"
    }
}

/// Deducts cost without consuming wall time
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantRunner;

impl SliceRunner for InstantRunner {
    fn run(&self, job: &Job, budget: Cost) -> Cost {
        units_before_yield(job, budget)
    }

    fn name(&self) -> &'static str {
        "instant"
    }
}
