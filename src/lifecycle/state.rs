//! Registration state machine.
//!
//! # States
//! - Unregistered: not yet added to the target group
//! - Registered: RegisterTargets succeeded
//! - Draining: DeregisterTargets succeeded, load balancer is draining
//!
//! # State Transitions
//! ```text
//! Unregistered → Registered: register succeeded
//! Registered   → Registered: register forwarded again (no local guard)
//! any          → Draining:   deregister succeeded
//! ```

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistrationState {
    #[default]
    Unregistered,
    Registered,
    Draining,
}

impl fmt::Display for RegistrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegistrationState::Unregistered => "unregistered",
            RegistrationState::Registered => "registered",
            RegistrationState::Draining => "draining",
        };
        f.write_str(name)
    }
}
