use std::thread;
use std::time::{Duration, Instant};

/// Default busy-spin threshold in milliseconds.
pub const DEFAULT_SPIN_THRESHOLD_MS: u64 = 5;

/// Two-strategy waiter for pacing the dispatch loop.
///
/// OS sleep granularity is too coarse to hit sub-5ms tap offsets
/// (often 1ms, sometimes 15ms), so waits below the threshold poll the
/// monotonic clock in a tight loop, trading a bounded amount of CPU
/// for accuracy. Waits at or above the threshold sleep, so multi-second
/// gaps between notes do not peg a core.
#[derive(Debug, Clone, Copy)]
pub struct HybridWaiter {
    threshold: Duration,
}

impl HybridWaiter {
    pub fn new() -> Self {
        Self::with_threshold(Duration::from_millis(DEFAULT_SPIN_THRESHOLD_MS))
    }

    pub fn with_threshold(threshold: Duration) -> Self {
        Self { threshold }
    }

    /// Block until `wait_ms` has elapsed.
    ///
    /// A non-positive wait returns immediately: the schedule has
    /// fallen behind and is passed through without compensation.
    pub fn wait_ms(&self, wait_ms: i64) {
        if wait_ms <= 0 {
            return;
        }
        let wait = Duration::from_millis(wait_ms as u64);
        if wait < self.threshold {
            Self::spin(wait);
        } else {
            thread::sleep(wait);
        }
    }

    fn spin(wait: Duration) {
        let deadline = Instant::now() + wait;
        while Instant::now() < deadline {
            std::hint::spin_loop();
        }
    }
}

impl Default for HybridWaiter {
    fn default() -> Self {
        Self::new()
    }
}
