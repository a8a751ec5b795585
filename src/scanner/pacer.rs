//! Probe pacing for the raw connect tier.
//!
//! Token-bucket pacing caps connection attempts per second so a port
//! scan stays polite on a shared LAN segment. Unlimited when disabled.

use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use std::num::NonZeroU32;
use std::sync::Arc;

type DirectLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Paces connection attempts to at most `rate` per second.
#[derive(Clone)]
pub struct ProbePacer {
    limiter: Option<Arc<DirectLimiter>>,
}

impl ProbePacer {
    /// A pacer for the given attempts-per-second rate; `0` disables
    /// pacing entirely.
    pub fn per_second(rate: u32) -> Self {
        let limiter = NonZeroU32::new(rate).map(|rate| {
            let quota = Quota::per_second(rate).allow_burst(nonzero!(1u32));
            Arc::new(RateLimiter::direct(quota))
        });
        Self { limiter }
    }

    /// Wait until the next attempt is allowed. Returns immediately when
    /// pacing is disabled.
    pub async fn acquire(&self) {
        if let Some(ref limiter) = self.limiter {
            limiter.until_ready().await;
        }
    }
}
