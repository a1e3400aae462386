//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (controller.rs):
//!     Resolve identity → [health gate] → Register (compensate on failure)
//!
//! Drain (controller.rs + shutdown.rs):
//!     Shutdown notification → Deregister → return
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//! ```
//!
//! # Design Decisions
//! - The drain trigger is an injected channel, not ambient process state
//! - No retries: every failure goes back to the caller

pub mod controller;
pub mod shutdown;
pub mod signals;
pub mod state;

pub use controller::{Identity, LifecycleController};
pub use shutdown::Shutdown;
pub use state::RegistrationState;
