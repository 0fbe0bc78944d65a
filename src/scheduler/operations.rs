/*!
 * Scheduler Core Operations
 * Push, cross-level pop, feedback and shutdown
 */

use super::feedback;
use super::signal::Wake;
use super::{Dispatch, Requeue, Scheduler};
use crate::core::errors::{SchedResult, SchedulerError};
use crate::core::types::{Cost, Job, Level};
use tracing::{debug, info};

impl Scheduler {
    /// Push a job onto `level`, blocking while that level is full
    pub fn push(&self, level: Level, job: Job) -> SchedResult<()> {
        let set = self.levels.get(level).ok_or(SchedulerError::InvalidLevel {
            level,
            levels: self.levels.len(),
        })?;

        // The ready-set lock is released inside push before we signal
        set.push(job);
        self.signal.notify_ready();
        Ok(())
    }

    /// Admit a freshly ingested job at the top level
    pub fn admit(&self, job: Job) -> SchedResult<()> {
        let id = job.id();
        self.push(0, job)?;
        self.stats.inc_admitted();
        debug!(job = id, "Job admitted");
        Ok(())
    }

    /// Next job to run, scanning levels from highest priority down
    ///
    /// Blocks while every level is empty. Returns `None` once the run flag is
    /// down and no push happened since the last empty scan.
    pub fn next_runnable(&self) -> Option<Dispatch> {
        loop {
            let seen = self.signal.epoch();

            for (level, set) in self.levels.iter().enumerate() {
                if let Some(job) = set.try_pop() {
                    return Some(Dispatch {
                        job,
                        level,
                        quantum: self.quanta[level],
                    });
                }
            }

            match self.signal.wait_for_change(seen) {
                Wake::Changed => continue,
                Wake::Closed => return None,
            }
        }
    }

    /// Re-enqueue an unfinished job according to the feedback rule
    ///
    /// Blocks while the target level is full. Returns the level the job was
    /// pushed to.
    pub fn requeue(&self, job: Job, level: Level, consumed: Cost) -> SchedResult<Level> {
        let next = self.migrate(&job, level, consumed)?;
        self.push(next, job)?;
        Ok(next)
    }

    /// Like `requeue`, but hands the job back instead of blocking
    ///
    /// Workers use this: a worker blocked on a full level cannot drain it,
    /// so when every worker did that the run would stall.
    pub fn try_requeue(&self, job: Job, level: Level, consumed: Cost) -> SchedResult<Requeue> {
        let next = self.migrate(&job, level, consumed)?;

        match self.levels[next].try_push(job) {
            Ok(()) => {
                self.signal.notify_ready();
                Ok(Requeue::Queued(next))
            }
            Err(job) => {
                debug!(job = job.id(), level = next, "Target level full; job retained");
                Ok(Requeue::Retained(Dispatch {
                    job,
                    level: next,
                    quantum: self.quanta[next],
                }))
            }
        }
    }

    /// Apply the feedback rule and record the migration
    fn migrate(&self, job: &Job, level: Level, consumed: Cost) -> SchedResult<Level> {
        let quantum = self.quantum(level).ok_or(SchedulerError::InvalidLevel {
            level,
            levels: self.levels.len(),
        })?;

        let (next, migration) = feedback::next_level(level, consumed, quantum, self.levels.len());
        debug!(
            job = job.id(),
            from = level,
            to = next,
            consumed,
            quantum,
            remaining = job.remaining_cost(),
            ?migration,
            "Job requeued"
        );

        self.stats.record_migration(migration);
        Ok(next)
    }

    #[inline]
    pub(crate) fn record_slice(&self) {
        self.stats.inc_slices();
    }

    #[inline]
    pub(crate) fn record_completion(&self, level: Level) {
        self.stats.record_completion(level);
    }

    /// Flip the run flag and wake every waiting worker
    ///
    /// Idempotent; returns `true` for the call that performed the transition.
    pub fn shutdown(&self) -> bool {
        let first = self.signal.close();
        if first {
            info!(queued = self.len(), "Scheduler run signal lowered");
        }
        first
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchedulerConfig;
    use std::time::Duration;

    fn scheduler() -> Scheduler {
        Scheduler::new(&SchedulerConfig::default().with_boost_interval(Duration::from_secs(60)))
            .unwrap()
    }

    #[test]
    fn test_requeue_full_quantum_demotes() {
        let sched = scheduler();
        let job = Job::new(1, "", 1, 12).unwrap();
        assert_eq!(sched.requeue(job, 0, 5).unwrap(), 1);
        assert_eq!(sched.level_len(1), Some(1));
        assert_eq!(sched.stats().demotions, 1);
    }

    #[test]
    fn test_requeue_early_yield_promotes() {
        let sched = scheduler();
        let job = Job::new(1, "", 1, 12).unwrap();
        assert_eq!(sched.requeue(job, 2, 3).unwrap(), 1);
        assert_eq!(sched.stats().promotions, 1);
    }

    #[test]
    fn test_try_requeue_retains_when_full() {
        let sched = Scheduler::new(
            &SchedulerConfig::default()
                .with_capacity(1)
                .with_boost_interval(Duration::from_secs(60)),
        )
        .unwrap();
        sched.push(1, Job::new(1, "", 1, 12).unwrap()).unwrap();

        let job = Job::new(2, "", 1, 12).unwrap();
        match sched.try_requeue(job, 0, 5).unwrap() {
            Requeue::Retained(dispatch) => {
                assert_eq!(dispatch.job.id(), 2);
                assert_eq!(dispatch.level, 1);
                assert_eq!(dispatch.quantum, 10);
            }
            Requeue::Queued(level) => panic!("pushed onto full level {level}"),
        }
        assert_eq!(sched.level_len(1), Some(1));
        assert_eq!(sched.stats().demotions, 1);

        // Promotion into the full level is retained too
        let job = Job::new(3, "", 1, 12).unwrap();
        assert!(matches!(
            sched.try_requeue(job, 2, 3).unwrap(),
            Requeue::Retained(Dispatch { level: 1, .. })
        ));

        let job = Job::new(4, "", 1, 30).unwrap();
        assert!(matches!(sched.try_requeue(job, 1, 10).unwrap(), Requeue::Queued(2)));
    }

    #[test]
    fn test_admit_counts() {
        let sched = scheduler();
        sched.admit(Job::new(1, "a", 1, 1).unwrap()).unwrap();
        sched.admit(Job::new(2, "b", 1, 1).unwrap()).unwrap();
        let stats = sched.stats();
        assert_eq!(stats.admitted, 2);
        assert_eq!(stats.queued, 2);
    }
}
