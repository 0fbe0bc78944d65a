/*!
 * Selection Policy
 * Which job a ready set hands out when it holds more than one
 */

use crate::core::types::Job;
use serde::Serialize;
use std::collections::VecDeque;

/// Within-level selection policy
///
/// Across levels the scheduler is always strict-priority; this only decides
/// among jobs waiting at the same level. `ShortestJob` and `Priority` break
/// ties by lowest job id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionPolicy {
    /// Most recently pushed first (stack order)
    #[default]
    Lifo,
    /// Oldest first
    Fifo,
    /// Smallest remaining cost first
    ShortestJob,
    /// Highest priority hint first
    Priority,
}

impl SelectionPolicy {
    /// Index of the job to remove, or `None` if `jobs` is empty
    pub(crate) fn pick(self, jobs: &VecDeque<Job>) -> Option<usize> {
        if jobs.is_empty() {
            return None;
        }

        match self {
            Self::Lifo => Some(jobs.len() - 1),
            Self::Fifo => Some(0),
            Self::ShortestJob => jobs
                .iter()
                .enumerate()
                .min_by_key(|(_, job)| (job.remaining_cost(), job.id()))
                .map(|(idx, _)| idx),
            Self::Priority => jobs
                .iter()
                .enumerate()
                .min_by_key(|(_, job)| (std::cmp::Reverse(job.priority_hint()), job.id()))
                .map(|(idx, _)| idx),
        }
    }
}
