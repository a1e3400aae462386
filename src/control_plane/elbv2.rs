//! AWS Elastic Load Balancing v2 implementation of the control plane.

use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_elasticloadbalancingv2::error::DisplayErrorContext;
use aws_sdk_elasticloadbalancingv2::types::TargetDescription;
use aws_sdk_elasticloadbalancingv2::Client;

use crate::config::AwsConfig;
use crate::control_plane::{ControlPlane, HealthCheckSpec};
use crate::error::{LifecycleError, LifecycleResult};

/// Region used when neither configuration nor the environment names one.
pub const FALLBACK_REGION: &str = "us-east-1";

/// Control plane backed by the ELBv2 API.
#[derive(Clone, Debug)]
pub struct Elbv2ControlPlane {
    client: Client,
}

impl Elbv2ControlPlane {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the shared AWS configuration chain.
    ///
    /// Region resolution: `aws.region`, then the default provider chain,
    /// then [`FALLBACK_REGION`].
    pub async fn from_config(config: &AwsConfig) -> Self {
        let region = RegionProviderChain::first_try(config.region.clone().map(Region::new))
            .or_default_provider()
            .or_else(FALLBACK_REGION);

        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region);
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        tracing::debug!(
            region = ?sdk_config.region(),
            endpoint_override = config.endpoint_url.is_some(),
            "ELBv2 client configured"
        );

        Self::new(Client::new(&sdk_config))
    }

    fn target(instance_id: &str, port: u16) -> TargetDescription {
        TargetDescription::builder()
            .id(instance_id)
            .port(i32::from(port))
            .build()
    }
}

#[async_trait]
impl ControlPlane for Elbv2ControlPlane {
    async fn register_target(&self, target_group: &str, instance_id: &str, port: u16) -> LifecycleResult<()> {
        self.client
            .register_targets()
            .target_group_arn(target_group)
            .targets(Self::target(instance_id, port))
            .send()
            .await
            .map_err(|e| LifecycleError::Registration(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }

    async fn deregister_target(&self, target_group: &str, instance_id: &str, port: u16) -> LifecycleResult<()> {
        self.client
            .deregister_targets()
            .target_group_arn(target_group)
            .targets(Self::target(instance_id, port))
            .send()
            .await
            .map_err(|e| LifecycleError::Registration(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }

    async fn describe_health_check(&self, target_group: &str) -> LifecycleResult<HealthCheckSpec> {
        let output = self
            .client
            .describe_target_groups()
            .target_group_arns(target_group)
            .send()
            .await
            .map_err(|e| LifecycleError::TargetGroupLookup(DisplayErrorContext(&e).to_string()))?;

        let group = output.target_groups().first().ok_or_else(|| {
            LifecycleError::TargetGroupLookup(format!("target group {} not found", target_group))
        })?;

        HealthCheckSpec::from_matcher(
            group.health_check_path(),
            group.matcher().and_then(|m| m.http_code()),
        )
    }
}
