//! Configuration validation rules.
//!
//! All errors are collected rather than stopping at the first one.

use crate::config::schema::LauncherConfig;
use crate::error::{ComfyupError, Result};
use std::net::IpAddr;

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Config key the error refers to
    pub field: &'static str,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a configuration and return all errors.
pub fn validate_config(config: &LauncherConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.repository_url.trim().is_empty() {
        errors.push(ValidationError::new(
            "repository_url",
            "repository_url must not be empty",
        ));
    }

    if config.python.trim().is_empty() {
        errors.push(ValidationError::new("python", "python must not be empty"));
    }

    if config.entry_point.trim().is_empty() {
        errors.push(ValidationError::new(
            "entry_point",
            "entry_point must not be empty",
        ));
    }

    if !is_valid_host(&config.bind_host) {
        errors.push(ValidationError::new(
            "bind_host",
            format!(
                "bind_host '{}' is not an IP address or hostname",
                config.bind_host
            ),
        ));
    }

    if config.bind_port == 0 {
        errors.push(ValidationError::new(
            "bind_port",
            "bind_port must be between 1 and 65535",
        ));
    }

    if config.sandbox_path == config.checkout_path {
        errors.push(ValidationError::new(
            "sandbox_path",
            "sandbox_path and checkout_path must be different directories",
        ));
    }

    if config.clone_depth == Some(0) {
        errors.push(ValidationError::new(
            "clone_depth",
            "clone_depth must be at least 1",
        ));
    }

    if config.wait_for_ready {
        if config.readiness_timeout_seconds == 0 {
            errors.push(ValidationError::new(
                "readiness_timeout_seconds",
                "readiness_timeout_seconds must be positive when wait_for_ready is set",
            ));
        }
        if config.initial_interval_ms == 0 {
            errors.push(ValidationError::new(
                "initial_interval_ms",
                "initial_interval_ms must be positive",
            ));
        }
        if config.max_interval_ms < config.initial_interval_ms {
            errors.push(ValidationError::new(
                "max_interval_ms",
                "max_interval_ms must not be smaller than initial_interval_ms",
            ));
        }
    }

    errors
}

/// Validate a configuration.
///
/// # Errors
///
/// Returns `ConfigValidationError` listing every problem found.
pub fn validate(config: &LauncherConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(ComfyupError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}

fn is_valid_host(host: &str) -> bool {
    if host.parse::<IpAddr>().is_ok() {
        return true;
    }
    !host.is_empty()
        && host.len() <= 253
        && host.split('.').all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}
