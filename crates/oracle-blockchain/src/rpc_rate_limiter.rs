use std::num::NonZeroU32;

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};

/// Client-side cap on RPC requests per second. Unlimited when not configured.
pub(crate) struct RpcRateLimiter {
    limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl RpcRateLimiter {
    pub(crate) fn new(requests_per_second: Option<u32>) -> Self {
        let limiter = requests_per_second
            .and_then(NonZeroU32::new)
            .map(|rps| RateLimiter::direct(Quota::per_second(rps)));

        Self { limiter }
    }

    pub(crate) async fn acquire(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unlimited_limiter_never_waits() {
        let limiter = RpcRateLimiter::new(None);
        assert!(limiter.limiter.is_none());
        for _ in 0..100 {
            limiter.acquire().await;
        }
    }

    #[test]
    fn zero_rate_means_unlimited() {
        assert!(RpcRateLimiter::new(Some(0)).limiter.is_none());
        assert!(RpcRateLimiter::new(Some(25)).limiter.is_some());
    }
}
