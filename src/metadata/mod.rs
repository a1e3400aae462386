//! Instance identity lookup.
//!
//! # Data Flow
//! ```text
//! LifecycleController::new
//!     → InstanceMetadata::instance_id / local_address
//!     → imds.rs (EC2 instance metadata service)
//!       or StaticMetadata (fixed values from configuration)
//! ```

pub mod imds;

use async_trait::async_trait;

use crate::error::{LifecycleError, LifecycleResult};

pub use imds::ImdsMetadata;

/// Source of the running instance's identity.
#[async_trait]
pub trait InstanceMetadata: Send + Sync {
    /// Id used when registering with the target group.
    async fn instance_id(&self) -> LifecycleResult<String>;

    /// Address the local health endpoint is reachable on.
    async fn local_address(&self) -> LifecycleResult<String>;
}

/// Identity supplied up front, for hosts without a metadata service.
#[derive(Debug, Clone)]
pub struct StaticMetadata {
    instance_id: String,
    local_address: String,
}

impl StaticMetadata {
    pub fn new(instance_id: impl Into<String>, local_address: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            local_address: local_address.into(),
        }
    }
}

#[async_trait]
impl InstanceMetadata for StaticMetadata {
    async fn instance_id(&self) -> LifecycleResult<String> {
        non_blank("instance-id", self.instance_id.clone())
    }

    async fn local_address(&self) -> LifecycleResult<String> {
        non_blank("local-ipv4", self.local_address.clone())
    }
}

/// Reject empty lookups; an empty identity is as unusable as a failed one.
pub(crate) fn non_blank(key: &str, value: String) -> LifecycleResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LifecycleError::MetadataUnavailable(format!("{} is empty", key)));
    }
    Ok(trimmed.to_string())
}
