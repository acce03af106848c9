//! Fixed-window request counting for the verification endpoints.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

use crate::clock::Clock;
use crate::error::Error;

/// Margin added to the advertised retry delay so callers that honor it land
/// comfortably inside a fresh window.
const RETRY_AFTER_MARGIN: Duration = Duration::from_secs(5);

/// Fixed-window request counter for one endpoint family.
///
/// The window tolerates bursts of up to twice the limit across a window
/// boundary. The remote service accepts that imprecision, so the simpler
/// algorithm stays.
pub(crate) struct RateLimitBucket {
    limit: u32,
    period: Duration,
    state: Mutex<BucketState>,
    clock: Arc<dyn Clock>,
}

struct BucketState {
    window_start: Instant,
    count: u32,
}

impl RateLimitBucket {
    pub(crate) fn new(limit: u32, period: Duration, clock: Arc<dyn Clock>) -> Self {
        assert!(limit > 0, "bucket limit must be positive");
        assert!(!period.is_zero(), "bucket period must be positive");

        let window_start = clock.now();
        Self {
            limit,
            period,
            state: Mutex::new(BucketState {
                window_start,
                count: 0,
            }),
            clock,
        }
    }

    /// Claim one request slot in the current window.
    ///
    /// Call immediately before using the limited resource; every `Ok` return
    /// accounts for exactly one request. A full window fails with
    /// [`Error::RateLimited`] (`local: true`) and leaves the count untouched.
    pub(crate) fn run(&self) -> Result<(), Error> {
        let now = self.clock.now();
        let mut state = self.state.lock();

        // After `trigger` the window start can sit in the future; saturating
        // math keeps the elapsed time at zero until the clock catches up.
        if now.saturating_duration_since(state.window_start) >= self.period {
            state.count = 0;
            state.window_start = now;
        } else if state.count >= self.limit {
            let window_end = state.window_start + self.period;
            let retry_after = window_end.saturating_duration_since(now) + RETRY_AFTER_MARGIN;
            debug!(
                "rate limit window full, retry after {}s",
                retry_after.as_secs()
            );
            return Err(Error::RateLimited {
                retry_after,
                local: true,
            });
        }

        state.count += 1;
        Ok(())
    }

    /// Force the bucket into an exhausted state on a remote throttle signal.
    ///
    /// Moves the window start `retry_after` into the future with a full
    /// count, so [`run`](Self::run) keeps failing for `retry_after + period`
    /// from this call.
    pub(crate) fn trigger(&self, retry_after: Duration) {
        let now = self.clock.now();
        let mut state = self.state.lock();
        state.count = self.limit;
        state.window_start = now + retry_after;
    }
}
