//! Configuration validation.
//!
//! Semantic checks on top of what serde already guarantees. Returns all
//! validation errors, not just the first.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("database.url must not be empty")]
    EmptyDatabaseUrl,

    #[error("database.max_connections must be at least 1")]
    ZeroPoolSize,

    #[error("limits.max_body_bytes must be at least 1")]
    ZeroBodyCap,

    #[error("rate_limit.requests_per_second must be positive")]
    NonPositiveRate,

    #[error("rate_limit.burst_size must be at least 1")]
    BurstTooSmall,

    #[error("rate_limit.sweep_interval_secs must be positive when max_idle_secs is set")]
    ZeroSweepInterval,

    #[error("timeouts.request_secs must be at least 1")]
    ZeroRequestTimeout,

    #[error("observability.metrics_address {0:?} is not a valid socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a config, collecting every violation.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.database.url.is_empty() {
        errors.push(ValidationError::EmptyDatabaseUrl);
    }
    if config.database.max_connections == 0 {
        errors.push(ValidationError::ZeroPoolSize);
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyCap);
    }

    if config.rate_limit.enabled {
        if config.rate_limit.requests_per_second <= 0.0 {
            errors.push(ValidationError::NonPositiveRate);
        }
        if config.rate_limit.burst_size < 1.0 {
            errors.push(ValidationError::BurstTooSmall);
        }
        if config.rate_limit.max_idle_secs > 0 && config.rate_limit.sweep_interval_secs == 0 {
            errors.push(ValidationError::ZeroSweepInterval);
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn collects_multiple_errors() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.database.url = String::new();
        config.rate_limit.requests_per_second = 0.0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn rate_limit_checks_skipped_when_disabled() {
        let mut config = AppConfig::default();
        config.rate_limit.enabled = false;
        config.rate_limit.requests_per_second = 0.0;

        assert!(validate_config(&config).is_ok());
    }
}
