//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (ports valid, timeouts > 0)
//! - Detect half-specified identity overrides
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LifecycleConfig → Result<(), Vec<ValidationError>>

use std::fmt;

use crate::config::schema::LifecycleConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
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

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Check a fully merged configuration.
pub fn validate_config(config: &LifecycleConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.target_group.arn.trim().is_empty() {
        errors.push(ValidationError::new("target_group.arn", "must be set"));
    }

    if config.target_group.port == 0 {
        errors.push(ValidationError::new("target_group.port", "must be between 1 and 65535"));
    }

    if config.health.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "health.request_timeout_secs",
            "must be greater than zero",
        ));
    }

    let metadata = &config.metadata;
    match (&metadata.instance_id, &metadata.local_address) {
        (Some(_), None) => errors.push(ValidationError::new(
            "metadata.local_address",
            "must be set together with metadata.instance_id",
        )),
        (None, Some(_)) => errors.push(ValidationError::new(
            "metadata.instance_id",
            "must be set together with metadata.local_address",
        )),
        _ => {}
    }

    if !LOG_LEVELS.contains(&config.logging.level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::new(
            "logging.level",
            format!("unknown level '{}'", config.logging.level),
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

    fn valid() -> LifecycleConfig {
        let mut config = LifecycleConfig::default();
        config.target_group.arn = "arn:aws:elasticloadbalancing:us-east-1:123:targetgroup/web/abc".into();
        config.target_group.port = 8080;
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = LifecycleConfig::default();
        config.health.request_timeout_secs = 0;
        config.logging.level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "target_group.arn",
                "target_group.port",
                "health.request_timeout_secs",
                "logging.level",
            ]
        );
    }

    #[test]
    fn test_identity_override_needs_both_fields() {
        let mut config = valid();
        config.metadata.instance_id = Some("i-0abc".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "metadata.local_address");

        config.metadata.local_address = Some("10.0.0.5".into());
        assert!(validate_config(&config).is_ok());
    }
}
