// src/services/rate_limit.rs
// DOCUMENTATION: Per-client-IP rate limiting for credential endpoints
// PURPOSE: Slow down password guessing and token email flooding

use crate::errors::AppError;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Keyed GCRA limiter shared across workers
#[derive(Clone)]
pub struct AuthRateLimiter {
    limiter: Arc<DefaultKeyedRateLimiter<String>>,
}

impl AuthRateLimiter {
    /// `per_minute` of zero is treated as one
    pub fn per_minute(per_minute: u32) -> Self {
        let burst = NonZeroU32::new(per_minute).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: Arc::new(RateLimiter::keyed(Quota::per_minute(burst))),
        }
    }

    /// Consume one request for `key`
    pub fn check(&self, key: &str) -> Result<(), AppError> {
        self.limiter.check_key(&key.to_string()).map_err(|_| {
            log::warn!("Rate limit exceeded for {}", key);
            AppError::RateLimitExceeded
        })
    }

    /// Drop state for keys that are back to a full quota
    pub fn retain_recent(&self) {
        self.limiter.retain_recent();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_applies_per_key() {
        let limiter = AuthRateLimiter::per_minute(3);

        for _ in 0..3 {
            assert!(limiter.check("10.0.0.1").is_ok());
        }
        assert!(matches!(
            limiter.check("10.0.0.1"),
            Err(AppError::RateLimitExceeded)
        ));

        assert!(limiter.check("10.0.0.2").is_ok());
    }

    #[test]
    fn test_zero_quota_still_allows_one() {
        let limiter = AuthRateLimiter::per_minute(0);
        assert!(limiter.check("k").is_ok());
        assert!(limiter.check("k").is_err());
    }
}
