/*!
 * MLFQ Scheduler Simulator
 * Multi-level feedback queue scheduling over a pool of worker threads
 */

pub mod cli;
pub mod config;
pub mod core;
pub mod execution;
pub mod ingest;
pub mod lifecycle;
pub mod monitoring;
pub mod report;
pub mod scheduler;

// Re-exports
pub use crate::core::errors::{
    ConfigError, ConfigResult, MlfqError, MlfqResult, SchedResult, SchedulerError,
};
pub use crate::core::types::{Cost, Job, JobId, Level, Priority};
pub use config::{IngestConfig, MlfqConfig, SchedulerConfig, WorkerConfig};
pub use execution::{InstantRunner, SliceRunner, TimedRunner, Worker, WorkerPool, WorkerReport};
pub use ingest::{CostSampler, IngestReport, Ingestor};
pub use lifecycle::{run, RunSummary, Runtime};
pub use monitoring::init_tracing;
pub use report::{Completion, OutputFormat, Reporter};
pub use scheduler::{
    Dispatch, Migration, ReadySet, Requeue, Scheduler, SchedulerStats, SelectionPolicy,
};
