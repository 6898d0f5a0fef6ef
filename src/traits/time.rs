/// Abstraction over the playback clock.
/// Implementations: SystemTimeProvider (production), MockTimeProvider (testing).
pub trait TimeProvider {
    /// Milliseconds elapsed since the provider was started.
    fn now_ms(&self) -> i64;
}

/// Monotonic clock anchored at construction time. Constructing one at
/// dispatch start gives elapsed-since-start timing that is immune to
/// wall-clock adjustments.
pub struct SystemTimeProvider {
    start: std::time::Instant,
}

impl SystemTimeProvider {
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

impl Default for SystemTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeProvider for SystemTimeProvider {
    fn now_ms(&self) -> i64 {
        self.start.elapsed().as_millis() as i64
    }
}

/// Mock time provider for deterministic testing.
pub struct MockTimeProvider {
    current_ms: std::cell::Cell<i64>,
}

impl MockTimeProvider {
    pub fn new() -> Self {
        Self {
            current_ms: std::cell::Cell::new(0),
        }
    }

    pub fn set_time(&self, ms: i64) {
        self.current_ms.set(ms);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.current_ms.set(self.current_ms.get() + delta_ms);
    }
}

impl Default for MockTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeProvider for MockTimeProvider {
    fn now_ms(&self) -> i64 {
        self.current_ms.get()
    }
}
