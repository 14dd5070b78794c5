//! Unit tests for the token service.


use std::sync::atomic::{AtomicI64, Ordering};

use super::Clock;

/// Deterministic clock injected into managers under test; steppable to
/// simulate elapsed time.
pub(crate) struct FixedClock(AtomicI64);

impl FixedClock {
    pub(crate) fn at(millis: i64) -> Self {
        Self(AtomicI64::new(millis))
    }

    pub(crate) fn set(&self, millis: i64) {
        self.0.store(millis, Ordering::SeqCst);
    }

    pub(crate) fn advance(&self, millis: i64) {
        self.0.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for &FixedClock {
    fn now_millis(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}
