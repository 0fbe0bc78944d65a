/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use super::types::{JobId, Level};
use miette::Diagnostic;
use thiserror::Error;

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Scheduler result type
pub type SchedResult<T> = Result<T, SchedulerError>;

/// Unified result type
pub type MlfqResult<T> = Result<T, MlfqError>;

/// Startup configuration errors
///
/// All of these are detected before any thread is spawned.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ConfigError {
    #[error("At least one queue level is required")]
    #[diagnostic(
        code(config::empty_quanta),
        help("Pass a comma separated list of quanta, e.g. --quanta 5,10,20")
    )]
    EmptyQuanta,

    #[error("Quantum for level {level} is zero")]
    #[diagnostic(code(config::zero_quantum), help("Every quantum must be at least 1 unit."))]
    ZeroQuantum { level: Level },

    #[error("Quanta must strictly increase with level: level {level} has {quantum}, previous level has {previous}")]
    #[diagnostic(
        code(config::quanta_not_increasing),
        help("Lower priority levels get longer slices, e.g. 5,10,20.")
    )]
    QuantaNotIncreasing {
        level: Level,
        quantum: u32,
        previous: u32,
    },

    #[error("Too many levels: {levels} (maximum {max})")]
    #[diagnostic(code(config::too_many_levels))]
    TooManyLevels { levels: usize, max: usize },

    #[error("Invalid ready-set capacity {capacity} (must be 1..={max})")]
    #[diagnostic(code(config::invalid_capacity))]
    InvalidCapacity { capacity: usize, max: usize },

    #[error("Invalid worker count {workers} (must be 1..={max})")]
    #[diagnostic(code(config::invalid_worker_count))]
    InvalidWorkerCount { workers: usize, max: usize },

    #[error("Boost interval must be greater than zero")]
    #[diagnostic(
        code(config::zero_boost_interval),
        help("Without a boost, CPU-bound jobs at low levels can starve.")
    )]
    ZeroBoostInterval,

    #[error("Invalid cost range {min}..={max}")]
    #[diagnostic(
        code(config::invalid_cost_range),
        help("The minimum cost must be at least 1 and not larger than the maximum.")
    )]
    InvalidCostRange { min: u32, max: u32 },

    #[error("I/O-bound ratio {0} is outside 0.0..=1.0")]
    #[diagnostic(code(config::invalid_io_ratio))]
    InvalidIoRatio(String),

    #[error("I/O burst must be at least 1 unit")]
    #[diagnostic(code(config::zero_io_burst))]
    ZeroIoBurst,
}

/// Scheduler runtime errors
#[derive(Error, Debug, Diagnostic)]
pub enum SchedulerError {
    #[error("Failed to reserve storage for level {level} ({capacity} slots)")]
    #[diagnostic(
        code(scheduler::allocation_failed),
        help("System may be low on memory. Reduce --capacity or the number of levels.")
    )]
    AllocationFailed { level: Level, capacity: usize },

    #[error("Level {level} out of range (scheduler has {levels} levels)")]
    #[diagnostic(code(scheduler::invalid_level))]
    InvalidLevel { level: Level, levels: usize },

    #[error("Job {0} must have a cost of at least 1 unit")]
    #[diagnostic(code(scheduler::invalid_cost))]
    InvalidCost(JobId),

    #[error("Failed to spawn thread {name}: {source}")]
    #[diagnostic(
        code(scheduler::spawn_failed),
        help("Check system thread limits or reduce --workers.")
    )]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Thread {0} panicked")]
    #[diagnostic(
        code(scheduler::worker_panicked),
        help("An unexpected internal error occurred. Please report this issue.")
    )]
    WorkerPanicked(String),
}

/// Unified error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum MlfqError {
    #[error("Configuration error: {0}")]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Scheduler error: {0}")]
    #[diagnostic(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("I/O error: {0}")]
    #[diagnostic(
        code(mlfq::io_error),
        help("Check that the input file exists and is readable.")
    )]
    Io(#[from] std::io::Error),
}
