//! # Drive interface
//!
//! A differential drive with odometry, two front bump switches and four cliff/tape sensors.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::EqptError;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Odometry and sensor data accumulated since the previous poll.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Default)]
pub struct OdomSample {
    /// Distance travelled, negative when reversing
    pub distance_delta_mm: f64,

    /// Rotation, positive counter-clockwise (to the left)
    pub angle_delta_deg: f64,

    pub bump_left: bool,
    pub bump_right: bool,

    pub cliff_front_left_signal: u16,
    pub cliff_left_signal: u16,
    pub cliff_front_right_signal: u16,
    pub cliff_right_signal: u16,
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A differential drive.
pub trait Drive {
    /// Demand wheel velocities in mm/s. Positive is forwards.
    fn set_wheel_velocities(&mut self, left: i16, right: i16) -> Result<(), EqptError>;

    /// Read the odometry accumulated since the last call. Blocks for at most one sensor period.
    fn poll_odometry(&mut self) -> Result<OdomSample, EqptError>;

    /// Stop both wheels.
    fn stop(&mut self) -> Result<(), EqptError> {
        self.set_wheel_velocities(0, 0)
    }
}
