// src/services/cleanup.rs
// DOCUMENTATION: Periodic background housekeeping
// PURPOSE: Purge expired one-time tokens and idle rate limiter state

use crate::db::TokenRepository;
use crate::services::AuthRateLimiter;
use sqlx::PgPool;
use std::time::Duration;

/// Spawn the housekeeping loop on the current runtime
pub fn start_cleanup_task(pool: PgPool, limiter: AuthRateLimiter, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;

            match TokenRepository::delete_expired(&pool).await {
                Ok(0) => {}
                Ok(purged) => log::info!("Purged {} expired auth tokens", purged),
                Err(e) => log::warn!("Token cleanup failed: {}", e),
            }
            limiter.retain_recent();
        }
    });
}
