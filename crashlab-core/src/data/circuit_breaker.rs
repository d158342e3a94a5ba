//! Circuit breaker for provider rate limiting and bans.
//!
//! Repeated rate-limit responses trip the breaker; a ban signal trips it
//! immediately. While open, all requests are refused until the cooldown
//! expires.

use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Inner {
    tripped_at: Option<Instant>,
    consecutive_failures: u32,
}

/// Circuit breaker shared by the connectors of one provider.
#[derive(Debug)]
pub struct CircuitBreaker {
    inner: Mutex<Inner>,
    cooldown: Duration,
    failure_threshold: u32,
}

impl CircuitBreaker {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                tripped_at: None,
                consecutive_failures: 0,
            }),
            cooldown,
            failure_threshold: 3,
        }
    }

    /// Default provider breaker: 30-minute cooldown, trips after 3
    /// consecutive failures.
    pub fn default_provider() -> Self {
        Self::new(Duration::from_secs(30 * 60))
    }

    /// Check if requests are currently allowed.
    pub fn is_allowed(&self) -> bool {
        let mut inner = self.inner.lock().unwrap();
        match inner.tripped_at {
            None => true,
            Some(tripped_at) => {
                if tripped_at.elapsed() >= self.cooldown {
                    inner.tripped_at = None;
                    inner.consecutive_failures = 0;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Record a successful request — resets the failure counter.
    pub fn record_success(&self) {
        self.inner.lock().unwrap().consecutive_failures = 0;
    }

    /// Record a failure. Trips the breaker once the threshold is reached.
    pub fn record_failure(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.consecutive_failures += 1;
        if inner.consecutive_failures >= self.failure_threshold {
            inner.tripped_at = Some(Instant::now());
        }
    }

    /// Immediately trip the breaker (for an outright ban).
    pub fn trip(&self) {
        self.inner.lock().unwrap().tripped_at = Some(Instant::now());
    }

    /// Remaining cooldown time (zero if not tripped).
    pub fn remaining_cooldown(&self) -> Duration {
        match self.inner.lock().unwrap().tripped_at {
            None => Duration::ZERO,
            Some(tripped_at) => self.cooldown.saturating_sub(tripped_at.elapsed()),
        }
    }
}
