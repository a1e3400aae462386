//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → command-line overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → LifecycleConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so the tool runs from flags alone
//! - Validation runs after flags are merged, not on the raw file

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{AwsConfig, HealthConfig, LifecycleConfig, LogFormat, MetadataConfig};
