//! Instance lifecycle controller.
//!
//! # Responsibilities
//! - Resolve and hold the instance identity
//! - Gate registration on the local health endpoint
//! - Register, deregister, and compensate a failed registration
//! - Drain: deregister when the shutdown notification arrives

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::control_plane::ControlPlane;
use crate::error::LifecycleResult;
use crate::health::{health_url, HealthPoller};
use crate::lifecycle::shutdown::wait_for_shutdown;
use crate::lifecycle::state::RegistrationState;
use crate::metadata::InstanceMetadata;

/// Who this instance is, as seen by the target group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub instance_id: String,
    pub local_address: String,
    pub target_group: String,
    pub port: u16,
}

/// Drives one instance through register → drain against one target group.
pub struct LifecycleController {
    identity: Identity,
    control_plane: Arc<dyn ControlPlane>,
    poller: HealthPoller,
    state: RegistrationState,
}

impl LifecycleController {
    /// Resolve the instance identity and bind it to `target_group:port`.
    ///
    /// Fails with `MetadataUnavailable` if either lookup fails.
    pub async fn new(
        target_group: impl Into<String>,
        port: u16,
        metadata: &dyn InstanceMetadata,
        control_plane: Arc<dyn ControlPlane>,
        poller: HealthPoller,
    ) -> LifecycleResult<Self> {
        let instance_id = metadata.instance_id().await?;
        let local_address = metadata.local_address().await?;

        let identity = Identity {
            instance_id,
            local_address,
            target_group: target_group.into(),
            port,
        };

        tracing::info!(
            instance_id = %identity.instance_id,
            local_address = %identity.local_address,
            target_group = %identity.target_group,
            port = identity.port,
            "Instance identity resolved"
        );

        Ok(Self {
            identity,
            control_plane,
            poller,
            state: RegistrationState::Unregistered,
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn state(&self) -> RegistrationState {
        self.state
    }

    /// Wait for the local endpoint to satisfy the target group's health check.
    ///
    /// `Ok(false)` means `max_wait` passed without a healthy answer.
    pub async fn check_health(&self, max_wait: Duration) -> LifecycleResult<bool> {
        let spec = self
            .control_plane
            .describe_health_check(&self.identity.target_group)
            .await?;
        let url = health_url(&self.identity.local_address, self.identity.port, &spec.path)?;

        tracing::info!(
            url = %url,
            expected_status = spec.expected_status,
            max_wait = ?max_wait,
            "Waiting for local health check"
        );

        self.poller.wait_until_healthy(&url, &spec, max_wait).await
    }

    /// Add this instance to the target group.
    ///
    /// Not guarded locally: registering twice issues a second API call.
    pub async fn register(&mut self) -> LifecycleResult<()> {
        if self.state == RegistrationState::Registered {
            tracing::warn!(
                instance_id = %self.identity.instance_id,
                "Register called while already registered"
            );
        }

        let Identity { target_group, instance_id, port, .. } = &self.identity;
        self.control_plane
            .register_target(target_group, instance_id, *port)
            .await?;

        self.state = RegistrationState::Registered;
        tracing::info!(instance_id = %instance_id, port = *port, "Instance registered");
        Ok(())
    }

    /// Register, deregistering as cleanup if that fails.
    ///
    /// The register error is always the one returned; a cleanup failure is
    /// only logged.
    pub async fn register_or_compensate(&mut self) -> LifecycleResult<()> {
        let Err(err) = self.register().await else {
            return Ok(());
        };

        tracing::error!(error = %err, "Registration failed, deregistering partial registration");
        if let Err(cleanup) = self.deregister().await {
            tracing::warn!(error = %cleanup, "Compensating deregister failed");
        }
        Err(err)
    }

    /// Remove this instance from the target group.
    ///
    /// Every call reaches the API regardless of local state.
    pub async fn deregister(&mut self) -> LifecycleResult<()> {
        let Identity { target_group, instance_id, port, .. } = &self.identity;
        self.control_plane
            .deregister_target(target_group, instance_id, *port)
            .await?;

        self.state = RegistrationState::Draining;
        tracing::info!(instance_id = %instance_id, port = *port, "Instance draining");
        Ok(())
    }

    /// Register, park until `shutdown` fires, then deregister once.
    pub async fn run_until_shutdown(&mut self, mut shutdown: broadcast::Receiver<()>) -> LifecycleResult<()> {
        self.register_or_compensate().await?;

        tracing::info!("Waiting for termination signal");
        wait_for_shutdown(&mut shutdown).await;

        tracing::info!(instance_id = %self.identity.instance_id, "Termination requested, deregistering");
        self.deregister().await
    }
}
