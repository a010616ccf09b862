//! Reference clock and cooperative cancellation for the playback loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Longest single sleep before the cancel flag is checked again.
pub const SLEEP_SLICE: Duration = Duration::from_millis(10);

/// Time source for pacing.
///
/// `now` is measured from an arbitrary fixed origin; only differences matter.
pub trait Clock {
    fn now(&self) -> Duration;
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Shared stop flag, set by the Ctrl+C handler.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Sleep for `duration` in slices, returning early if `cancel` fires.
///
/// Returns `true` if the full duration elapsed, `false` if cancelled.
pub fn sleep_interruptible<C: Clock + ?Sized>(
    clock: &C,
    duration: Duration,
    cancel: &CancelToken,
) -> bool {
    let deadline = clock.now() + duration;
    loop {
        if cancel.is_cancelled() {
            return false;
        }
        let now = clock.now();
        if now >= deadline {
            return true;
        }
        clock.sleep((deadline - now).min(SLEEP_SLICE));
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::Cell;

    /// Manually advanced clock; `sleep` advances it instantly.
    #[derive(Debug, Default)]
    pub struct ManualClock {
        now: Cell<Duration>,
    }

    impl ManualClock {
        pub fn advance(&self, d: Duration) {
            self.now.set(self.now.get() + d);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Duration {
            self.now.get()
        }

        fn sleep(&self, duration: Duration) {
            self.advance(duration);
        }
    }
}
