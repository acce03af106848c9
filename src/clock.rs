//! Clock seam for the time-dependent components.
//!
//! The bucket and the cache take their notion of "now" from a [`Clock`] so
//! tests can drive time explicitly instead of sleeping.

use std::time::Instant;

/// Source of the current instant.
pub(crate) trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Production clock backed by `Instant::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
