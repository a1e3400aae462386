//! Local health polling.
//!
//! # Responsibilities
//! - Build the health check URL from the instance address and target group check
//! - Poll until the expected status is observed or the deadline passes
//!
//! # Design Decisions
//! - Fixed 100ms interval, no backoff
//! - A transport error ends the poll immediately
//! - Only the status code is inspected

use std::time::Duration;

use tokio::time::{self, Instant};
use url::Url;

use crate::control_plane::HealthCheckSpec;
use crate::error::{LifecycleError, LifecycleResult};

/// Delay between consecutive health requests.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Build `http://{address}:{port}{path}`.
///
/// `path` is always placed after the authority, never resolved against it,
/// so a path such as `//other.host/x` stays on the local address.
pub fn health_url(local_address: &str, port: u16, path: &str) -> LifecycleResult<Url> {
    let host = if local_address.contains(':') && !local_address.starts_with('[') {
        format!("[{}]", local_address)
    } else {
        local_address.to_string()
    };

    let mut url = Url::parse(&format!("http://{}:{}", host, port)).map_err(|e| {
        LifecycleError::HealthCheck(format!(
            "invalid health check target {}:{}{}: {}",
            local_address, port, path, e
        ))
    })?;

    let (path, query) = match path.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (path, None),
    };
    url.set_path(path);
    url.set_query(query);
    Ok(url)
}

/// HTTP poller for the instance's own health endpoint.
#[derive(Debug, Clone)]
pub struct HealthPoller {
    client: reqwest::Client,
}

impl HealthPoller {
    /// Create a poller whose individual requests give up after `request_timeout`.
    pub fn new(request_timeout: Duration) -> LifecycleResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .no_proxy()
            .user_agent(concat!("alb-lifecycle/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LifecycleError::HealthCheck(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Poll `url` until it answers with `spec.expected_status`.
    ///
    /// Returns `Ok(false)` once more than `max_wait` has passed since the
    /// first request without a match.
    pub async fn wait_until_healthy(
        &self,
        url: &Url,
        spec: &HealthCheckSpec,
        max_wait: Duration,
    ) -> LifecycleResult<bool> {
        let start = Instant::now();
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            let response = self
                .client
                .get(url.clone())
                .send()
                .await
                .map_err(|e| LifecycleError::HealthCheck(format!("GET {}: {}", url, e)))?;

            let status = response.status().as_u16();
            if status == spec.expected_status {
                tracing::debug!(url = %url, attempts, elapsed = ?start.elapsed(), "Health check passed");
                return Ok(true);
            }

            if start.elapsed() > max_wait {
                tracing::warn!(
                    url = %url,
                    attempts,
                    last_status = status,
                    expected = spec.expected_status,
                    "Health check did not pass before deadline"
                );
                return Ok(false);
            }

            tracing::debug!(url = %url, status, expected = spec.expected_status, "Not healthy yet");
            time::sleep(POLL_INTERVAL).await;
        }
    }
}
