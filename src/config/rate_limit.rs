use serde::Deserialize;

/// Rate limiting for credential and creation endpoints
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RateLimitConfig {
    /// Sustained requests per minute per client
    pub requests_per_minute: u64,

    /// Requests allowed in a burst before throttling starts
    pub burst_size: u32,
}

impl RateLimitConfig {
    /// Validate rate limiting configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.requests_per_minute == 0 || self.requests_per_minute > 60_000 {
            return Err("RATE_LIMIT_PER_MINUTE must be between 1 and 60000".to_string());
        }

        if self.burst_size == 0 {
            return Err("RATE_LIMIT_BURST must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Milliseconds between replenished request permits
    pub fn replenish_interval_ms(&self) -> u64 {
        (60_000 / self.requests_per_minute).max(1)
    }
}
