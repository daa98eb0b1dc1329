//! Bounded waits.
//!
//! Every wait in the suite is a poll loop with an explicit deadline. The check
//! always runs at least once, so a zero timeout degrades to a single check.
//! A check that is still pending at the deadline is dropped.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::{Duration, Instant};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Wait for optional page furniture such as the cookie banner (2 seconds)
pub const COOKIE_BANNER_TIMEOUT_MS: u64 = 2_000;

/// Default wait for a required element (5 seconds)
pub const DEFAULT_ELEMENT_TIMEOUT_MS: u64 = 5_000;

/// Wait for a URL change after navigation (30 seconds)
pub const NAVIGATION_TIMEOUT_MS: u64 = 30_000;

/// Wait for the contact form response region (30 seconds)
pub const FORM_RESPONSE_TIMEOUT_MS: u64 = 30_000;

/// Delay between checks (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

// =============================================================================
// TIMEOUTS
// =============================================================================

/// Every bound used by a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeouts {
    /// Optional element wait
    pub optional_ms: u64,
    /// Required element wait
    pub element_ms: u64,
    /// Navigation wait
    pub navigation_ms: u64,
    /// Form response wait
    pub form_response_ms: u64,
    /// Poll interval
    pub poll_interval_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            optional_ms: COOKIE_BANNER_TIMEOUT_MS,
            element_ms: DEFAULT_ELEMENT_TIMEOUT_MS,
            navigation_ms: NAVIGATION_TIMEOUT_MS,
            form_response_ms: FORM_RESPONSE_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl Timeouts {
    /// Short bounds for tests against scripted pages
    #[must_use]
    pub const fn fast() -> Self {
        Self {
            optional_ms: 30,
            element_ms: 50,
            navigation_ms: 50,
            form_response_ms: 50,
            poll_interval_ms: 5,
        }
    }

    /// Optional element bound
    #[must_use]
    pub const fn optional(&self) -> Duration {
        Duration::from_millis(self.optional_ms)
    }

    /// Required element bound
    #[must_use]
    pub const fn element(&self) -> Duration {
        Duration::from_millis(self.element_ms)
    }

    /// Navigation bound
    #[must_use]
    pub const fn navigation(&self) -> Duration {
        Duration::from_millis(self.navigation_ms)
    }

    /// Form response bound
    #[must_use]
    pub const fn form_response(&self) -> Duration {
        Duration::from_millis(self.form_response_ms)
    }

    /// Poll interval
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// POLLING
// =============================================================================

/// Poll `check` until it yields `Some` or `timeout` elapses.
///
/// The check runs at least once, and each run is cut off at the deadline.
/// Returns `None` on timeout.
pub async fn poll_until<T, F, Fut>(timeout: Duration, interval: Duration, mut check: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if let Ok(Some(value)) = tokio::time::timeout(remaining, check()).await {
            return Some(value);
        }
        let now = Instant::now();
        if now >= deadline {
            return None;
        }
        tokio::time::sleep(interval.min(deadline - now)).await;
    }
}

/// Milliseconds in a duration, saturating
#[must_use]
pub fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
