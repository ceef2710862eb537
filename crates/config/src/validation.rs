//! Configuration validation

use crate::{AppConfig, ConfigError, Result};
use url::Url;

/// Upper bound for the dispatch worker pool
pub const MAX_WORKERS: usize = 16;

/// Validation error details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate the entire application configuration
pub fn validate_config(config: &AppConfig) -> Result<()> {
    let mut errors = Vec::new();

    // Validate feed config
    if let Err(e) = validate_feed_url(&config.feed.rss_url) {
        errors.push(ValidationError::new("feed.rss_url", e));
    }

    if config.feed.precheck_timeout_ms == 0 {
        errors.push(ValidationError::new(
            "feed.precheck_timeout_ms",
            "must be greater than 0",
        ));
    }

    if config.feed.request_timeout_ms == 0 {
        errors.push(ValidationError::new(
            "feed.request_timeout_ms",
            "must be greater than 0",
        ));
    }

    // Validate store config
    if config.store.path.as_os_str().is_empty() {
        errors.push(ValidationError::new("store.path", "store path is required"));
    }

    // Validate dispatch config
    if config.dispatch.max_workers == 0 || config.dispatch.max_workers > MAX_WORKERS {
        errors.push(ValidationError::new(
            "dispatch.max_workers",
            format!("must be between 1 and {MAX_WORKERS}"),
        ));
    }

    if config.dispatch.task_timeout_ms == 0 {
        errors.push(ValidationError::new(
            "dispatch.task_timeout_ms",
            "must be greater than 0",
        ));
    }

    if config.dispatch.run_timeout_ms < config.dispatch.task_timeout_ms {
        errors.push(ValidationError::new(
            "dispatch.run_timeout_ms",
            "must be >= dispatch.task_timeout_ms",
        ));
    }

    // Validate notifier config
    let has_token = !config.notifier.bot_token.is_empty();
    let has_chat = !config.notifier.chat_id.is_empty();
    if has_token != has_chat {
        errors.push(ValidationError::new(
            "notifier",
            "bot_token and chat_id must be set together",
        ));
    }

    if config.telemetry.default_filter.trim().is_empty() {
        errors.push(ValidationError::new(
            "telemetry.default_filter",
            "filter cannot be empty",
        ));
    }

    // Return all errors if any were found
    if !errors.is_empty() {
        let error_msg = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ConfigError::ValidationError(error_msg));
    }

    Ok(())
}

/// Validate the feed URL: absolute, http(s), with a host
pub fn validate_feed_url(url: &str) -> std::result::Result<(), String> {
    if url.is_empty() {
        return Err("URL cannot be empty".to_string());
    }

    let parsed = Url::parse(url).map_err(|e| format!("malformed URL: {e}"))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err("URL must start with http:// or https://".to_string());
    }

    if parsed.host_str().is_none() {
        return Err("URL must include a host".to_string());
    }

    Ok(())
}
