/*!
 * Execution
 * Slice runners and the worker pool
 */

mod runner;
mod worker;

pub use runner::{units_before_yield, InstantRunner, SliceRunner, TimedRunner};
pub use worker::{Worker, WorkerPool, WorkerReport};
