/*!
 * Ready Signal
 *
 * Cross-level "some level became non-empty" notification plus the run flag.
 *
 * # Lost wake-ups
 *
 * Every push bumps an epoch under the signal mutex. A consumer reads the
 * epoch before scanning the levels and only sleeps while it is unchanged,
 * so a push that lands between the scan and the wait is always observed.
 */

use parking_lot::{Condvar, Mutex};

/// Outcome of waiting on the ready signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wake {
    /// At least one push happened since the epoch was read
    Changed,
    /// Run flag is down and nothing was pushed since the epoch was read
    Closed,
}

struct SignalState {
    running: bool,
    epoch: u64,
}

pub(crate) struct ReadySignal {
    state: Mutex<SignalState>,
    ready: Condvar,
}

impl ReadySignal {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SignalState {
                running: true,
                epoch: 0,
            }),
            ready: Condvar::new(),
        }
    }

    #[inline]
    pub fn epoch(&self) -> u64 {
        self.state.lock().epoch
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state.lock().running
    }

    /// Record a push and wake one waiter
    pub fn notify_ready(&self) {
        let mut state = self.state.lock();
        state.epoch = state.epoch.wrapping_add(1);
        drop(state);
        self.ready.notify_one();
    }

    /// Flip the run flag and wake every waiter
    ///
    /// Returns `true` only for the call that performed the transition.
    pub fn close(&self) -> bool {
        let mut state = self.state.lock();
        let was_running = std::mem::replace(&mut state.running, false);
        drop(state);
        self.ready.notify_all();
        was_running
    }

    /// Block until a push newer than `seen` or until closed
    pub fn wait_for_change(&self, seen: u64) -> Wake {
        let mut state = self.state.lock();
        loop {
            if state.epoch != seen {
                return Wake::Changed;
            }
            if !state.running {
                return Wake::Closed;
            }
            self.ready.wait(&mut state);
        }
    }
}
