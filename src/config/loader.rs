//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::LifecycleConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse configuration from TOML text without validating it.
///
/// Validation is deferred because command-line flags may still fill in
/// required fields.
pub fn parse_config(content: &str) -> Result<LifecycleConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Read and parse a TOML configuration file.
pub fn load_config(path: &Path) -> Result<LifecycleConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Accept a fully merged configuration if it passes semantic validation.
pub fn finalize_config(config: LifecycleConfig) -> Result<LifecycleConfig, ConfigError> {
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogFormat;
    use std::io::Write;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.health.max_wait_secs, 30);
        assert_eq!(config.health.request_timeout_secs, 5);
        assert!(!config.health.check_before_register);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.aws.region.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[target_group]
arn = "arn:aws:elasticloadbalancing:eu-west-1:123:targetgroup/api/def"
port = 9000

[health]
check_before_register = true
max_wait_secs = 10

[aws]
region = "eu-west-1"

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = finalize_config(load_config(file.path()).unwrap()).unwrap();
        assert_eq!(config.target_group.port, 9000);
        assert!(config.health.check_before_register);
        assert_eq!(config.health.max_wait_secs, 10);
        assert_eq!(config.aws.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_config(Path::new("/nonexistent/alb-lifecycle.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/alb-lifecycle.toml"));
    }

    #[test]
    fn test_bad_port_type_is_parse_error() {
        let err = parse_config("[target_group]\nport = \"eighty\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_finalize_rejects_incomplete_config() {
        let err = finalize_config(LifecycleConfig::default()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("target_group.arn"));
        assert!(message.contains("target_group.port"));
    }
}
