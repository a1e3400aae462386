//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (instance_id, url, port, ...)
//!     → logging.rs subscriber (pretty or JSON, stderr)
//! ```

pub mod logging;

pub use logging::init_logging;
