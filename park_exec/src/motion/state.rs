//! Motion state machine

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::MoveStatus;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// State of the motion controller.
///
/// Forward moves go from `Idle` through `Moving` to one of the terminal states. Turns go through
/// `Turning` independently of the forward move states.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum MotionState {
    Idle,
    Moving,
    Turning,
    Complete,
    BumpedLeft,
    BumpedRight,
    CliffLeft,
    CliffRight,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for MotionState {
    fn default() -> Self {
        MotionState::Idle
    }
}

impl MotionState {
    /// True if a primitive is in progress.
    pub fn is_active(&self) -> bool {
        matches!(self, MotionState::Moving | MotionState::Turning)
    }
}

impl From<MoveStatus> for MotionState {
    fn from(status: MoveStatus) -> Self {
        match status {
            MoveStatus::Complete => MotionState::Complete,
            MoveStatus::BumpedLeft => MotionState::BumpedLeft,
            MoveStatus::BumpedRight => MotionState::BumpedRight,
            MoveStatus::CliffLeft => MotionState::CliffLeft,
            MoveStatus::CliffRight => MotionState::CliffRight,
        }
    }
}
