//! Outbound request throttling using Governor.
//!
//! Implements a token bucket shared by every upstream rate fetch.

use std::{num::NonZeroU32, time::Duration};

use async_trait::async_trait;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};

/// Admission control for outbound calls.
///
/// Callers await [`RequestThrottle::acquire`] before each network request.
#[async_trait]
pub trait RequestThrottle: Send + Sync + 'static {
    /// Waits until a request may be sent.
    async fn acquire(&self);
}

/// Token bucket allowing `requests` calls per `period`, refilled evenly.
pub struct GovernorThrottle {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl Default for GovernorThrottle {
    fn default() -> Self {
        Self::per_minute(30)
    }
}

impl GovernorThrottle {
    /// Creates a new throttle.
    ///
    /// # Arguments
    /// * `requests` - Number of requests allowed per period (0 is treated as 1)
    /// * `period` - Time period for the quota
    pub fn new(requests: u32, period: Duration) -> Self {
        let burst = NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(period / burst.get())
            .unwrap_or_else(|| Quota::per_minute(burst))
            .allow_burst(burst);

        Self {
            limiter: RateLimiter::direct(quota),
        }
    }

    pub fn per_minute(requests: u32) -> Self {
        Self::new(requests, Duration::from_secs(60))
    }

    /// Takes a token without waiting. Returns false if the bucket is empty.
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

#[async_trait]
impl RequestThrottle for GovernorThrottle {
    async fn acquire(&self) {
        self.limiter.until_ready().await;
    }
}

/// Throttle that admits everything immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unthrottled;

#[async_trait]
impl RequestThrottle for Unthrottled {
    async fn acquire(&self) {}
}
