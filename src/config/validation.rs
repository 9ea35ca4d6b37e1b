//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts, body limits, addresses)
//! - Reject credentials that can never match a request path
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::handlers::timing::MAX_DELAY_SECS;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error(
        "timeouts.request_secs ({0}) must be greater than the {max}s delay ceiling",
        max = MAX_DELAY_SECS
    )]
    RequestTimeout(u64),

    #[error("limits.max_body_size must be greater than zero")]
    BodyLimit,

    #[error("auth.credentials must contain at least one pair")]
    NoCredentials,

    #[error("auth.credentials[{0}]: username must be non-empty and contain no '/'")]
    Username(usize),

    #[error("auth.credentials[{0}]: password must not contain '/'")]
    Password(usize),

    #[error("images.upstream '{0}' is not an absolute http(s) URL")]
    ImageUpstream(String),

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    LogLevel(String),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.timeouts.request_secs <= MAX_DELAY_SECS {
        errors.push(ValidationError::RequestTimeout(config.timeouts.request_secs));
    }

    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::BodyLimit);
    }

    if config.auth.credentials.is_empty() {
        errors.push(ValidationError::NoCredentials);
    }
    for (i, cred) in config.auth.credentials.iter().enumerate() {
        if cred.username.is_empty() || cred.username.contains('/') {
            errors.push(ValidationError::Username(i));
        }
        // A slash in the password splits the path into more than two segments.
        if cred.password.contains('/') {
            errors.push(ValidationError::Password(i));
        }
    }

    match url::Url::parse(&config.images.upstream) {
        Ok(u) if matches!(u.scheme(), "http" | "https") && u.has_host() => {}
        _ => errors.push(ValidationError::ImageUpstream(config.images.upstream.clone())),
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
