//! EC2 instance metadata (IMDSv2) implementation.

use async_trait::async_trait;
use aws_config::imds::Client;

use crate::config::MetadataConfig;
use crate::error::{LifecycleError, LifecycleResult};
use crate::metadata::{non_blank, InstanceMetadata};

const INSTANCE_ID_PATH: &str = "/latest/meta-data/instance-id";
const LOCAL_IPV4_PATH: &str = "/latest/meta-data/local-ipv4";

/// Reads identity from the instance metadata service.
#[derive(Clone)]
pub struct ImdsMetadata {
    client: Client,
}

impl ImdsMetadata {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client, honouring an endpoint override if one is configured.
    pub fn from_config(config: &MetadataConfig) -> LifecycleResult<Self> {
        let mut builder = Client::builder();
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint(endpoint).map_err(|e| {
                LifecycleError::MetadataUnavailable(format!("invalid IMDS endpoint '{}': {}", endpoint, e))
            })?;
        }
        Ok(Self::new(builder.build()))
    }

    async fn fetch(&self, key: &str, path: &str) -> LifecycleResult<String> {
        let value = self
            .client
            .get(path)
            .await
            .map_err(|e| LifecycleError::MetadataUnavailable(format!("{}: {}", key, e)))?;
        non_blank(key, value.as_ref().to_string())
    }
}

#[async_trait]
impl InstanceMetadata for ImdsMetadata {
    async fn instance_id(&self) -> LifecycleResult<String> {
        self.fetch("instance-id", INSTANCE_ID_PATH).await
    }

    async fn local_address(&self) -> LifecycleResult<String> {
        self.fetch("local-ipv4", LOCAL_IPV4_PATH).await
    }
}
