//! Error kinds surfaced by the lifecycle and its collaborators.

use thiserror::Error;

use crate::config::loader::ConfigError;

/// Errors that can occur while driving the instance lifecycle.
///
/// None of these are recovered internally. They propagate to the caller,
/// which is expected to abort the process.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Instance identity could not be determined.
    #[error("instance metadata unavailable: {0}")]
    MetadataUnavailable(String),

    /// The target group's health check could not be fetched or understood.
    #[error("target group lookup failed: {0}")]
    TargetGroupLookup(String),

    /// A local health check failed at the transport level.
    #[error("health check failed: {0}")]
    HealthCheck(String),

    /// RegisterTargets or DeregisterTargets was rejected.
    #[error("registration failed: {0}")]
    Registration(String),

    /// SIGINT/SIGTERM handlers could not be installed.
    #[error("failed to install signal handlers: {0}")]
    Signal(std::io::Error),

    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for lifecycle operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;
