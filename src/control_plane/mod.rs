//! Load balancer control plane.
//!
//! # Data Flow
//! ```text
//! LifecycleController
//!     → ControlPlane::register_target / deregister_target
//!     → ControlPlane::describe_health_check → HealthCheckSpec
//!     → elbv2.rs (AWS ELBv2 API)
//! ```
//!
//! # Design Decisions
//! - The controller only sees the trait, so tests substitute a fake
//! - Exactly one target group per controller

pub mod elbv2;

use async_trait::async_trait;

use crate::error::{LifecycleError, LifecycleResult};

pub use elbv2::Elbv2ControlPlane;

/// Health check configured on a target group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheckSpec {
    /// Request path, e.g. `/health`.
    pub path: String,
    /// Status code that counts as healthy.
    pub expected_status: u16,
}

impl HealthCheckSpec {
    /// Build a spec from a target group's raw health check path and matcher.
    ///
    /// Only a single status code is supported. Ranges (`200-299`) and lists
    /// (`200,202`) are rejected.
    pub fn from_matcher(path: Option<&str>, http_code: Option<&str>) -> LifecycleResult<Self> {
        let path = path
            .filter(|p| !p.is_empty())
            .ok_or_else(|| LifecycleError::TargetGroupLookup("target group has no health check path".into()))?;

        let code = http_code
            .ok_or_else(|| LifecycleError::TargetGroupLookup("target group has no HTTP matcher".into()))?
            .trim();

        let expected_status = code.parse::<u16>().map_err(|_| {
            LifecycleError::TargetGroupLookup(format!(
                "unsupported health check matcher '{}': expected a single status code",
                code
            ))
        })?;

        Ok(Self {
            path: path.to_string(),
            expected_status,
        })
    }
}

/// Operations the lifecycle needs from the load balancer.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Add `instance_id:port` to the target group.
    async fn register_target(&self, target_group: &str, instance_id: &str, port: u16) -> LifecycleResult<()>;

    /// Remove `instance_id:port` from the target group.
    async fn deregister_target(&self, target_group: &str, instance_id: &str, port: u16) -> LifecycleResult<()>;

    /// Fetch the health check the target group applies to its members.
    async fn describe_health_check(&self, target_group: &str) -> LifecycleResult<HealthCheckSpec>;
}
