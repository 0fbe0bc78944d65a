/*!
 * Run Lifecycle
 *
 * Wires ingestion, the worker pool and the reporter around one scheduler
 * and coordinates shutdown:
 * 1. join ingestion (it lowers the run signal when input ends)
 * 2. lower the run signal again in case ingestion died early
 * 3. join every worker; in-flight jobs run to completion
 * 4. close the completion channel and join the reporter
 */

use crate::config::MlfqConfig;
use crate::core::errors::{MlfqResult, SchedulerError};
use crate::execution::{InstantRunner, SliceRunner, TimedRunner, WorkerPool, WorkerReport};
use crate::ingest::{CostSampler, IngestReport, Ingestor};
use crate::monitoring::{generate_run_id, span_run};
use crate::report::Reporter;
use crate::scheduler::{Scheduler, SchedulerStats};
use serde::Serialize;
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::thread;
use tracing::{info, info_span};

/// Everything observed during one run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub ingest: IngestReport,
    pub workers: Vec<WorkerReport>,
    /// Completion lines written by the reporter
    pub reported: u64,
    pub stats: SchedulerStats,
}

/// One configured scheduler run
pub struct Runtime {
    config: MlfqConfig,
    runner: Arc<dyn SliceRunner>,
    sampler: CostSampler,
}

impl Runtime {
    /// Validate `config` and pick the default runner and sampler for it
    pub fn new(config: MlfqConfig) -> MlfqResult<Self> {
        config.validate()?;

        let unit = config.workers.slice_unit;
        let runner: Arc<dyn SliceRunner> = if unit.is_zero() {
            Arc::new(InstantRunner)
        } else {
            Arc::new(TimedRunner::new(unit))
        };
        let sampler = CostSampler::from_config(&config.ingest);

        Ok(Self {
            config,
            runner,
            sampler,
        })
    }

    pub fn with_runner(mut self, runner: Arc<dyn SliceRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_sampler(mut self, sampler: CostSampler) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn config(&self) -> &MlfqConfig {
        &self.config
    }

    /// Run to completion: read every record from `input`, write one
    /// completion line per finished job to `output`
    pub fn run<R, W>(self, input: R, output: W) -> MlfqResult<RunSummary>
    where
        R: BufRead + Send + 'static,
        W: Write + Send + 'static,
    {
        let run_id = generate_run_id();
        let span = span_run(&run_id);
        let _entered = span.enter();

        let scheduler = Scheduler::new(&self.config.scheduler)?;
        let (completions, reporter) = Reporter::spawn(self.config.format, output)?;

        let pool = match WorkerPool::spawn(
            self.config.workers.workers,
            &scheduler,
            self.runner,
            &completions,
        ) {
            Ok(pool) => pool,
            Err(e) => {
                drop(completions);
                let _ = reporter.join();
                return Err(e.into());
            }
        };
        // Workers hold their own senders; the reporter exits when they do
        drop(completions);

        let ingestor = Ingestor::new(scheduler.clone(), self.sampler);
        let ingest_span = info_span!("ingest");
        let name = "mlfq-ingest".to_string();
        let ingest_handle = match thread::Builder::new()
            .name(name.clone())
            .spawn(move || ingest_span.in_scope(|| ingestor.run(input)))
        {
            Ok(handle) => handle,
            Err(source) => {
                scheduler.shutdown();
                let _ = pool.join();
                let _ = reporter.join();
                return Err(SchedulerError::Spawn { name, source }.into());
            }
        };

        let ingest = ingest_handle
            .join()
            .map_err(|_| SchedulerError::WorkerPanicked(name))
            .and_then(|result| result);

        scheduler.shutdown();
        let workers = pool.join();
        let reported = reporter.join()?;

        let ingest = ingest?;
        let workers = workers?;
        let stats = scheduler.stats();

        info!(
            records = ingest.records,
            completions = stats.completions,
            slices = stats.slices,
            demotions = stats.demotions,
            promotions = stats.promotions,
            boosts = stats.boosts,
            boosted_jobs = stats.boosted_jobs,
            "Run complete"
        );

        Ok(RunSummary {
            run_id,
            ingest,
            workers,
            reported,
            stats,
        })
    }
}

/// Run with the default runner and sampler for `config`
pub fn run<R, W>(config: MlfqConfig, input: R, output: W) -> MlfqResult<RunSummary>
where
    R: BufRead + Send + 'static,
    W: Write + Send + 'static,
{
    Runtime::new(config)?.run(input, output)
}
