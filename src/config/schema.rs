//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the lifecycle
//! tool. All types derive Serde traits for deserialization from TOML files,
//! and every section can be omitted.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Target group the instance joins.
    pub target_group: TargetGroupConfig,

    /// Health gate settings.
    pub health: HealthConfig,

    /// AWS client settings.
    pub aws: AwsConfig,

    /// Instance identity source.
    pub metadata: MetadataConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Target group binding.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TargetGroupConfig {
    /// Target group ARN.
    pub arn: String,

    /// Port registered for this instance.
    pub port: u16,
}

/// Health gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Check the local endpoint before registering.
    pub check_before_register: bool,

    /// How long to wait for the service to become healthy, in seconds.
    pub max_wait_secs: u64,

    /// Timeout for a single health check request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            check_before_register: false,
            max_wait_secs: 30,
            request_timeout_secs: 5,
        }
    }
}

/// AWS client configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AwsConfig {
    /// Region override. Falls back to the default provider chain.
    pub region: Option<String>,

    /// Endpoint override for the load balancer API (e.g. a local emulator).
    pub endpoint_url: Option<String>,
}

/// Where the instance identity comes from.
///
/// With both `instance_id` and `local_address` set, instance metadata is not
/// queried at all.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MetadataConfig {
    /// IMDS endpoint override (default `http://169.254.169.254`).
    pub endpoint: Option<String>,

    /// Fixed instance id.
    pub instance_id: Option<String>,

    /// Fixed local address.
    pub local_address: Option<String>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,

    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}
