//! Health gating subsystem.
//!
//! # Data Flow
//! ```text
//! ControlPlane::describe_health_check
//!     → HealthCheckSpec { path, expected_status }
//!     → poller.rs: GET http://{local_address}:{port}{path} every 100ms
//!     → healthy | deadline passed | transport error
//! ```

pub mod poller;

pub use poller::{health_url, HealthPoller, POLL_INTERVAL};
