//! Per-chunk throughput limiting.
//!
//! A GCRA limiter with a burst of one: its theoretical arrival time is the
//! budget consumed so far, so the daemon only sleeps when it runs ahead of
//! `chunks_per_second` and never waits more than one chunk's interval.

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;

pub struct ChunkRateLimiter {
    inner: Option<DefaultDirectRateLimiter>,
}

impl ChunkRateLimiter {
    /// Limit to `chunks_per_second`; zero disables throttling.
    pub fn new(chunks_per_second: u32) -> Self {
        let inner = NonZeroU32::new(chunks_per_second).map(|rate| {
            RateLimiter::direct(Quota::per_second(rate).allow_burst(NonZeroU32::MIN))
        });
        Self { inner }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Wait until the next chunk may be processed.
    pub async fn throttle(&self) {
        if let Some(limiter) = &self.inner {
            limiter.until_ready().await;
        }
    }
}
