/*!
 * Ready Set
 * Bounded, thread-safe collection of runnable jobs for one level
 */

use super::policy::SelectionPolicy;
use crate::core::errors::{SchedResult, SchedulerError};
use crate::core::types::{Job, Level};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

/// Bounded ready set for a single level
///
/// Owns its own lock and "space freed" condvar. It knows nothing about the
/// cross-level ready signal: the `Scheduler` notifies that after a push
/// returns, so the two locks are never held together.
pub struct ReadySet {
    level: Level,
    capacity: usize,
    policy: SelectionPolicy,
    jobs: Mutex<VecDeque<Job>>,
    not_full: Condvar,
}

impl ReadySet {
    /// Create a ready set with all backing storage reserved up front
    pub fn new(level: Level, capacity: usize, policy: SelectionPolicy) -> SchedResult<Self> {
        let mut jobs = VecDeque::new();
        jobs.try_reserve_exact(capacity)
            .map_err(|_| SchedulerError::AllocationFailed { level, capacity })?;

        Ok(Self {
            level,
            capacity,
            policy,
            jobs: Mutex::new(jobs),
            not_full: Condvar::new(),
        })
    }

    /// Append a job, blocking while the set is full
    pub fn push(&self, job: Job) {
        let mut jobs = self.jobs.lock();
        while jobs.len() >= self.capacity {
            self.not_full.wait(&mut jobs);
        }
        jobs.push_back(job);
    }

    /// Append a job if there is room, otherwise hand it back
    pub fn try_push(&self, job: Job) -> Result<(), Job> {
        let mut jobs = self.jobs.lock();
        if jobs.len() >= self.capacity {
            return Err(job);
        }
        jobs.push_back(job);
        Ok(())
    }

    /// Remove one job according to the selection policy, never blocks
    pub fn try_pop(&self) -> Option<Job> {
        let mut jobs = self.jobs.lock();
        let idx = self.policy.pick(&jobs)?;
        // VecDeque::remove keeps the remaining jobs in order
        let job = jobs.remove(idx);
        drop(jobs);

        self.not_full.notify_one();
        job
    }

    /// Remove every job in one critical section
    pub fn drain(&self) -> Vec<Job> {
        let mut jobs = self.jobs.lock();
        if jobs.is_empty() {
            return Vec::new();
        }
        let drained: Vec<Job> = jobs.drain(..).collect();
        drop(jobs);

        self.not_full.notify_all();
        drained
    }

    /// Move jobs into `dest` until it is full or this set is empty
    ///
    /// Both locks are held for the whole move, so no other thread can refill
    /// this set or fill `dest` midway. Never blocks on capacity. Returns the
    /// number of jobs moved; jobs that did not fit stay here in order.
    ///
    /// Lock order: `self` before `dest`. The boost sweep is the only caller
    /// and always moves from a lower level into level 0.
    pub fn transfer_into(&self, dest: &ReadySet) -> usize {
        let mut jobs = self.jobs.lock();
        if jobs.is_empty() {
            return 0;
        }
        let mut dest_jobs = dest.jobs.lock();
        let room = dest.capacity.saturating_sub(dest_jobs.len());
        let count = room.min(jobs.len());
        dest_jobs.extend(jobs.drain(..count));
        drop(dest_jobs);
        drop(jobs);

        if count > 0 {
            self.not_full.notify_all();
        }
        count
    }

    pub fn len(&self) -> usize {
        self.jobs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn job(id: u64) -> Job {
        Job::new(id, format!("job-{id}"), 50, 10).unwrap()
    }

    #[test]
    fn test_try_pop_empty() {
        let rs = ReadySet::new(0, 4, SelectionPolicy::Lifo).unwrap();
        assert!(rs.try_pop().is_none());
        assert!(rs.is_empty());
    }

    #[test]
    fn test_lifo_order() {
        let rs = ReadySet::new(0, 4, SelectionPolicy::Lifo).unwrap();
        rs.push(job(1));
        rs.push(job(2));
        rs.push(job(3));

        assert_eq!(rs.try_pop().map(|j| j.id()), Some(3));
        assert_eq!(rs.try_pop().map(|j| j.id()), Some(2));
        assert_eq!(rs.try_pop().map(|j| j.id()), Some(1));
    }

    #[test]
    fn test_fifo_order() {
        let rs = ReadySet::new(0, 4, SelectionPolicy::Fifo).unwrap();
        for id in 1..=3 {
            rs.push(job(id));
        }

        let order: Vec<_> = std::iter::from_fn(|| rs.try_pop().map(|j| j.id())).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_try_push_full() {
        let rs = ReadySet::new(1, 2, SelectionPolicy::Lifo).unwrap();
        assert!(rs.try_push(job(1)).is_ok());
        assert!(rs.try_push(job(2)).is_ok());

        let rejected = rs.try_push(job(3)).unwrap_err();
        assert_eq!(rejected.id(), 3);
        assert_eq!(rs.len(), 2);
    }

    #[test]
    fn test_drain() {
        let rs = ReadySet::new(2, 8, SelectionPolicy::Lifo).unwrap();
        for id in 1..=5 {
            rs.push(job(id));
        }

        let ids: Vec<_> = rs.drain().iter().map(Job::id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert!(rs.is_empty());
        assert!(rs.drain().is_empty());
    }

    #[test]
    fn test_transfer_into_respects_dest_capacity() {
        let src = ReadySet::new(2, 8, SelectionPolicy::Fifo).unwrap();
        let dest = ReadySet::new(0, 3, SelectionPolicy::Fifo).unwrap();
        assert_eq!(dest.policy(), SelectionPolicy::Fifo);
        dest.push(job(1));
        for id in 10..15 {
            src.push(job(id));
        }

        assert_eq!(src.transfer_into(&dest), 2);
        assert_eq!(dest.len(), 3);
        let left: Vec<_> = src.drain().iter().map(Job::id).collect();
        assert_eq!(left, vec![12, 13, 14]);

        // Full destination: nothing moves and nothing blocks
        src.push(job(20));
        assert_eq!(src.transfer_into(&dest), 0);
        assert_eq!(src.len(), 1);
    }

    #[test]
    fn test_push_blocks_until_pop() {
        let rs = Arc::new(ReadySet::new(0, 1, SelectionPolicy::Fifo).unwrap());
        rs.push(job(1));

        let rs_clone = rs.clone();
        let handle = thread::spawn(move || rs_clone.push(job(2)));

        thread::sleep(Duration::from_millis(50));
        assert!(!handle.is_finished());
        assert_eq!(rs.len(), 1);

        assert_eq!(rs.try_pop().map(|j| j.id()), Some(1));
        handle.join().unwrap();
        assert_eq!(rs.try_pop().map(|j| j.id()), Some(2));
    }

    #[test]
    fn test_concurrent_no_loss_no_duplication() {
        const PRODUCERS: u64 = 4;
        const PER_PRODUCER: u64 = 500;

        let rs = Arc::new(ReadySet::new(0, 16, SelectionPolicy::Lifo).unwrap());

        let producers: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let rs = rs.clone();
                thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        rs.push(job(p * PER_PRODUCER + i + 1));
                    }
                })
            })
            .collect();

        let consumers: Vec<_> = (0..3)
            .map(|_| {
                let rs = rs.clone();
                thread::spawn(move || {
                    let mut seen = Vec::new();
                    let mut idle = 0;
                    while idle < 200 {
                        assert!(rs.len() <= rs.capacity());
                        match rs.try_pop() {
                            Some(j) => {
                                seen.push(j.id());
                                idle = 0;
                            }
                            None => {
                                idle += 1;
                                thread::sleep(Duration::from_millis(1));
                            }
                        }
                    }
                    seen
                })
            })
            .collect();

        for p in producers {
            p.join().unwrap();
        }

        let mut all = HashSet::new();
        let mut total = 0;
        for c in consumers {
            for id in c.join().unwrap() {
                assert!(all.insert(id), "job {} popped twice", id);
                total += 1;
            }
        }
        // Anything the consumers gave up on is still in the set
        for j in rs.drain() {
            assert!(all.insert(j.id()));
            total += 1;
        }

        assert_eq!(total, PRODUCERS * PER_PRODUCER);
    }

    proptest! {
        #[test]
        fn prop_count_stays_within_bounds(ops in proptest::collection::vec(any::<bool>(), 0..200)) {
            let rs = ReadySet::new(0, 8, SelectionPolicy::Fifo).unwrap();
            let mut next_id = 1;
            let mut expected: Vec<u64> = Vec::new();

            for push in ops {
                if push {
                    if rs.try_push(job(next_id)).is_ok() {
                        expected.push(next_id);
                    }
                    next_id += 1;
                } else if let Some(j) = rs.try_pop() {
                    prop_assert_eq!(j.id(), expected.remove(0));
                }
                prop_assert!(rs.len() <= rs.capacity());
                prop_assert_eq!(rs.len(), expected.len());
            }
        }
    }
}
