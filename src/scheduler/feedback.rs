/*!
 * Feedback Rule
 * Level migration after a slice that left work behind
 */

use crate::core::types::{Cost, Level};

/// Direction a job moved after its slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Migration {
    /// Gave the CPU up before its quantum ran out
    Promoted,
    /// Used the full quantum
    Demoted,
    /// Already at the boundary level in its direction
    Stayed,
}

/// Level for a job that consumed `consumed` of `quantum` and is not finished
pub fn next_level(level: Level, consumed: Cost, quantum: Cost, num_levels: usize) -> (Level, Migration) {
    let lowest = num_levels.saturating_sub(1);

    if consumed < quantum {
        match level.checked_sub(1) {
            Some(up) => (up, Migration::Promoted),
            None => (0, Migration::Stayed),
        }
    } else if level < lowest {
        (level + 1, Migration::Demoted)
    } else {
        (lowest, Migration::Stayed)
    }
}
