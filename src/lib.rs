//! Target group lifecycle for a single instance.
//!
//! Registers the instance with a load balancer target group (optionally after
//! its local health check passes) and deregisters it on SIGINT/SIGTERM so the
//! load balancer can drain in-flight requests before the process exits.

pub mod config;
pub mod control_plane;
pub mod error;
pub mod health;
pub mod lifecycle;
pub mod metadata;
pub mod observability;

pub use config::LifecycleConfig;
pub use error::{LifecycleError, LifecycleResult};
pub use lifecycle::{LifecycleController, Shutdown};
