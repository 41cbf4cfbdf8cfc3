//! Navigator state and transitions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cmd_flags::ModeSnapshot;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Top level state of the navigator.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum NavState {
    /// Waiting for the operator to start.
    Idle,

    /// Following gaps between objects.
    Autonomous,

    /// Executing the operator's manouvres.
    Manual,

    /// Approaching the parking zone posts.
    Parking,

    /// Parked between the posts, waiting for the operator.
    Parked,

    /// Stopped by the operator. Terminal.
    Stopped,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for NavState {
    fn default() -> Self {
        NavState::Idle
    }
}

impl fmt::Display for NavState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// The state for the next cycle.
pub fn transition(state: NavState, mode: &ModeSnapshot, post_zone: bool) -> NavState {
    use self::NavState::*;

    match (state, mode.running, mode.manual) {
        (Stopped, _, _) => Stopped,
        (Idle, false, _) => Idle,
        (_, false, _) => Stopped,
        (_, true, true) => Manual,
        (Parked, true, false) => Parked,
        (_, true, false) if post_zone => Parking,
        (_, true, false) => Autonomous,
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
