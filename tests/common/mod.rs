//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use alb_lifecycle::control_plane::{ControlPlane, HealthCheckSpec};
use alb_lifecycle::health::HealthPoller;
use alb_lifecycle::metadata::StaticMetadata;
use alb_lifecycle::{LifecycleController, LifecycleError, LifecycleResult};
use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const TARGET_GROUP: &str = "arn:aws:elasticloadbalancing:us-east-1:123456789012:targetgroup/web/0123456789abcdef";
pub const INSTANCE_ID: &str = "i-0123456789abcdef0";

/// Handle to a running mock health endpoint.
pub struct MockBackend {
    pub addr: SocketAddr,
    hits: Arc<Mutex<Vec<Instant>>>,
}

impl MockBackend {
    pub fn hits(&self) -> usize {
        self.hits.lock().unwrap().len()
    }

    pub fn hit_times(&self) -> Vec<Instant> {
        self.hits.lock().unwrap().clone()
    }
}

/// Start a programmable HTTP backend on an ephemeral loopback port.
///
/// `f` receives the zero-based request number and returns the status code.
pub async fn start_programmable_backend<F>(f: F) -> MockBackend
where
    F: Fn(usize) -> u16 + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(Mutex::new(Vec::new()));
    let counter = Arc::new(AtomicUsize::new(0));
    let f = Arc::new(f);

    let recorded = hits.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            recorded.lock().unwrap().push(Instant::now());
            let n = counter.fetch_add(1, Ordering::SeqCst);
            let status = f(n);

            tokio::spawn(async move {
                read_request_head(&mut socket).await;
                let body = "ok";
                let response = format!(
                    "HTTP/1.1 {} Mock\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    MockBackend { addr, hits }
}

async fn read_request_head(socket: &mut tokio::net::TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}

/// A loopback port with nothing listening on it.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Register { target_group: String, instance_id: String, port: u16 },
    Deregister { target_group: String, instance_id: String, port: u16 },
    Describe { target_group: String },
}

/// Control plane fake that records every call.
pub struct RecordingControlPlane {
    pub calls: Mutex<Vec<Call>>,
    pub register_error: Option<String>,
    pub deregister_error: Option<String>,
    pub health_check: Result<HealthCheckSpec, String>,
}

impl Default for RecordingControlPlane {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            register_error: None,
            deregister_error: None,
            health_check: Ok(HealthCheckSpec {
                path: "/health".into(),
                expected_status: 200,
            }),
        }
    }
}

impl RecordingControlPlane {
    pub fn with_health_check(path: &str, expected_status: u16) -> Self {
        Self {
            health_check: Ok(HealthCheckSpec {
                path: path.into(),
                expected_status,
            }),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    pub fn registers(&self) -> usize {
        self.count(|c| matches!(c, Call::Register { .. }))
    }

    pub fn deregisters(&self) -> usize {
        self.count(|c| matches!(c, Call::Deregister { .. }))
    }
}

#[async_trait]
impl ControlPlane for RecordingControlPlane {
    async fn register_target(&self, target_group: &str, instance_id: &str, port: u16) -> LifecycleResult<()> {
        self.calls.lock().unwrap().push(Call::Register {
            target_group: target_group.into(),
            instance_id: instance_id.into(),
            port,
        });
        match &self.register_error {
            Some(msg) => Err(LifecycleError::Registration(msg.clone())),
            None => Ok(()),
        }
    }

    async fn deregister_target(&self, target_group: &str, instance_id: &str, port: u16) -> LifecycleResult<()> {
        self.calls.lock().unwrap().push(Call::Deregister {
            target_group: target_group.into(),
            instance_id: instance_id.into(),
            port,
        });
        match &self.deregister_error {
            Some(msg) => Err(LifecycleError::Registration(msg.clone())),
            None => Ok(()),
        }
    }

    async fn describe_health_check(&self, target_group: &str) -> LifecycleResult<HealthCheckSpec> {
        self.calls.lock().unwrap().push(Call::Describe {
            target_group: target_group.into(),
        });
        self.health_check
            .clone()
            .map_err(LifecycleError::TargetGroupLookup)
    }
}

/// Controller bound to `127.0.0.1:port` with a recording control plane.
pub async fn controller(plane: Arc<RecordingControlPlane>, port: u16) -> LifecycleController {
    let metadata = StaticMetadata::new(INSTANCE_ID, "127.0.0.1");
    let poller = HealthPoller::new(Duration::from_secs(2)).unwrap();
    LifecycleController::new(TARGET_GROUP, port, &metadata, plane, poller)
        .await
        .unwrap()
}
