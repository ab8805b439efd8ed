//! Cache, counter window and retry validators

use super::trait_def::Validate;
use crate::config::models::*;

impl Validate for CacheConfig {
    fn validate(&self) -> Result<(), String> {
        for (name, ttl) in self.ttls() {
            if ttl == 0 {
                return Err(format!("Cache {} must be greater than 0", name));
            }
        }

        if self.sync_interval == 0 {
            return Err("Cache sync interval must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for RateLimitConfig {
    fn validate(&self) -> Result<(), String> {
        if self.token_window == 0 {
            return Err("Token window must be greater than 0".to_string());
        }

        if self.qps_window == 0 {
            return Err("QPS window must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("Retry max attempts must be at least 1".to_string());
        }

        if self.backoff_multiplier < 1.0 {
            return Err("Retry backoff multiplier must be at least 1.0".to_string());
        }

        if self.base_delay_ms > self.max_delay_ms {
            return Err("Retry base delay cannot exceed max delay".to_string());
        }

        Ok(())
    }
}
