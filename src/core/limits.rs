/*!
 * System Limits and Constants
 *
 * Defaults and hard limits for the scheduler, grouped by domain.
 */

use std::time::Duration;

// =============================================================================
// QUEUE LEVELS
// =============================================================================

/// Default per-level quanta (level 0 first)
/// Lower priority levels get longer slices
pub const DEFAULT_QUANTA: [u32; 3] = [5, 10, 20];

/// Upper bound on the number of levels
pub const MAX_LEVELS: usize = 64;

/// Default ready-set capacity per level
pub const DEFAULT_CAPACITY: usize = 1024;

/// Upper bound on ready-set capacity per level
pub const MAX_CAPACITY: usize = 1 << 20;

// =============================================================================
// BOOST
// =============================================================================

/// Default interval between priority boosts
pub const DEFAULT_BOOST_INTERVAL: Duration = Duration::from_millis(200);

// =============================================================================
// WORKERS
// =============================================================================

/// Default number of worker threads
pub const DEFAULT_WORKERS: usize = 4;

/// Upper bound on worker threads
pub const MAX_WORKERS: usize = 1024;

/// Wall time for one simulated work unit
pub const DEFAULT_SLICE_UNIT: Duration = Duration::from_millis(1);

// =============================================================================
// INGESTION
// =============================================================================

/// Default minimum sampled job cost
pub const DEFAULT_COST_MIN: u32 = 10;

/// Default maximum sampled job cost (inclusive)
pub const DEFAULT_COST_MAX: u32 = 49;

/// Priority hints are sampled from 1..=MAX_PRIORITY_HINT
pub const MAX_PRIORITY_HINT: u8 = 100;

/// Default units an I/O-bound job runs before yielding
pub const DEFAULT_IO_BURST: u32 = 1;
