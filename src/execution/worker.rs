/*!
 * Worker Pool
 * Threads that pull runnable jobs, execute one slice and apply feedback
 */

use super::runner::SliceRunner;
use crate::core::errors::{SchedResult, SchedulerError};
use crate::report::Completion;
use crate::scheduler::{Dispatch, Requeue, Scheduler};
use serde::Serialize;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, info_span, warn, Span};

/// What one worker did over its lifetime
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkerReport {
    pub worker: usize,
    pub slices: u64,
    pub completions: u64,
    pub boosts: u64,
}

/// A single worker loop
pub struct Worker {
    id: usize,
    scheduler: Scheduler,
    runner: Arc<dyn SliceRunner>,
    completions: flume::Sender<Completion>,
}

impl Worker {
    pub fn new(
        id: usize,
        scheduler: Scheduler,
        runner: Arc<dyn SliceRunner>,
        completions: flume::Sender<Completion>,
    ) -> Self {
        Self {
            id,
            scheduler,
            runner,
            completions,
        }
    }

    /// Run until the scheduler reports no more work
    pub fn run(self) -> SchedResult<WorkerReport> {
        let mut report = WorkerReport {
            worker: self.id,
            ..Default::default()
        };
        let mut reporter_gone = false;
        // A job whose target level was full runs again before anything else
        let mut retained: Option<Dispatch> = None;

        loop {
            if self.scheduler.boost_sweep() > 0 {
                report.boosts += 1;
            }

            let Some(Dispatch {
                mut job,
                level,
                quantum,
            }) = retained.take().or_else(|| self.scheduler.next_runnable())
            else {
                break;
            };

            let slice = job.remaining_cost().min(quantum);
            let consumed = self.runner.run(&job, slice).clamp(1, slice);
            job.consume(consumed);
            self.scheduler.record_slice();
            report.slices += 1;

            if job.is_complete() {
                self.scheduler.record_completion(level);
                report.completions += 1;
                debug!(job = job.id(), level, slices = job.slices(), "Job complete");

                if self.completions.send(Completion::from_job(&job, level)).is_err() && !reporter_gone {
                    warn!(worker = self.id, "Completion channel closed; completions are no longer reported");
                    reporter_gone = true;
                }
                continue;
            }

            if let Requeue::Retained(dispatch) = self.scheduler.try_requeue(job, level, consumed)? {
                retained = Some(dispatch);
            }
        }

        debug!(
            worker = self.id,
            slices = report.slices,
            completions = report.completions,
            "Worker exiting"
        );
        Ok(report)
    }
}

/// Fixed pool of worker threads
pub struct WorkerPool {
    handles: Vec<(String, JoinHandle<SchedResult<WorkerReport>>)>,
}

impl WorkerPool {
    /// Spawn `workers` named threads sharing one scheduler and runner
    ///
    /// If a spawn fails, the scheduler is shut down and the workers already
    /// started are joined before the error is returned.
    pub fn spawn(
        workers: usize,
        scheduler: &Scheduler,
        runner: Arc<dyn SliceRunner>,
        completions: &flume::Sender<Completion>,
    ) -> SchedResult<Self> {
        let parent = Span::current();
        let mut handles = Vec::with_capacity(workers);

        for id in 0..workers {
            let name = format!("mlfq-worker-{id}");
            let worker = Worker::new(id, scheduler.clone(), runner.clone(), completions.clone());
            let span = info_span!(parent: &parent, "worker", id);

            match thread::Builder::new()
                .name(name.clone())
                .spawn(move || span.in_scope(|| worker.run()))
            {
                Ok(handle) => handles.push((name, handle)),
                Err(source) => {
                    scheduler.shutdown();
                    let _ = Self { handles }.join();
                    return Err(SchedulerError::Spawn { name, source });
                }
            }
        }

        info!(workers, runner = runner.name(), "Worker pool started");
        Ok(Self { handles })
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait for every worker; the first failure is returned after all joined
    pub fn join(self) -> SchedResult<Vec<WorkerReport>> {
        let mut reports = Vec::with_capacity(self.handles.len());
        let mut first_error = None;

        for (name, handle) in self.handles {
            let outcome = handle
                .join()
                .map_err(|_| SchedulerError::WorkerPanicked(name))
                .and_then(|result| result);

            match outcome {
                Ok(report) => reports.push(report),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(reports),
        }
    }
}
