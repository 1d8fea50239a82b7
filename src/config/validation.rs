//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate URL schemes for HTTP and websocket endpoints
//! - Validate value ranges (timeouts > 0, backoff bounds ordered)
//! - Reject empty deploy commands
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: WatcherConfig → Result<(), Vec<ValidationError>>
//! - Runs before any provider connection is made

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::WatcherConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a loaded configuration.
pub fn validate_config(config: &WatcherConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "rpc.http_url", &config.rpc.http_url, &["http", "https"]);
    for (i, url) in config.rpc.failover_urls.iter().enumerate() {
        check_url(&mut errors, &format!("rpc.failover_urls[{i}]"), url, &["http", "https"]);
    }
    if let Some(ws_url) = &config.rpc.ws_url {
        check_url(&mut errors, "rpc.ws_url", ws_url, &["ws", "wss"]);
    }
    if config.rpc.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("rpc.rpc_timeout_secs", "must be greater than 0"));
    }
    if config.rpc.poll_interval_ms == 0 {
        errors.push(ValidationError::new("rpc.poll_interval_ms", "must be greater than 0"));
    }

    for (field, argv) in [
        ("deploy.mainnet", &config.deploy.mainnet),
        ("deploy.testnet", &config.deploy.testnet),
    ] {
        if argv.first().map_or(true, |program| program.trim().is_empty()) {
            errors.push(ValidationError::new(field, "command must name a program"));
        }
    }

    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::new("retries.max_attempts", "must be at least 1"));
    }
    if config.retries.base_delay_ms > config.retries.max_delay_ms {
        errors.push(ValidationError::new(
            "retries.base_delay_ms",
            format!("exceeds retries.max_delay_ms ({})", config.retries.max_delay_ms),
        ));
    }

    if config.watch.max_wait_secs == Some(0) {
        errors.push(ValidationError::new(
            "watch.max_wait_secs",
            "must be greater than 0 (omit it to wait forever)",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, value: &str, schemes: &[&str]) {
    match Url::parse(value) {
        Ok(url) if schemes.contains(&url.scheme()) => {}
        Ok(url) => errors.push(ValidationError::new(
            field,
            format!("unsupported scheme '{}', expected one of {:?}", url.scheme(), schemes),
        )),
        Err(e) => errors.push(ValidationError::new(field, format!("invalid URL '{value}': {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&WatcherConfig::default()).is_ok());
    }

    #[test]
    fn test_reports_every_error() {
        let mut config = WatcherConfig::default();
        config.rpc.http_url = "not a url".into();
        config.rpc.ws_url = Some("http://localhost:8546".into());
        config.deploy.testnet = Vec::new();
        config.retries.max_attempts = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            ["rpc.http_url", "rpc.ws_url", "deploy.testnet", "retries.max_attempts"]
        );
    }

    #[test]
    fn test_backoff_bounds_and_wait() {
        let mut config = WatcherConfig::default();
        config.retries.base_delay_ms = 5_000;
        config.retries.max_delay_ms = 1_000;
        config.watch.max_wait_secs = Some(0);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].to_string().starts_with("retries.base_delay_ms"));
        assert!(errors[1].to_string().contains("wait forever"));
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = WatcherConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
