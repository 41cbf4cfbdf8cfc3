//! Parameters structure for MotionCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for motion control.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionParams {
    // ---- SPEEDS ----
    /// Wheel speed when moving forwards.
    ///
    /// Units: millimeters/second
    pub forward_speed_mm_s: i16,

    /// Wheel speed when reversing, given as a positive value.
    ///
    /// Units: millimeters/second
    pub reverse_speed_mm_s: i16,

    /// Wheel speed when turning on the spot.
    ///
    /// Units: millimeters/second
    pub turn_speed_mm_s: i16,

    // ---- RECOVERY ----
    /// Distance reversed after a bump or cliff.
    ///
    /// Units: millimeters
    pub recovery_backoff_mm: f64,

    /// Cliff signals below this indicate an edge.
    pub cliff_low_signal: u16,

    /// Cliff signals above this indicate an edge (or boundary tape).
    pub cliff_high_signal: u16,

    // ---- TURNING ----
    /// Overshoot of a left turn, subtracted from every left turn target.
    ///
    /// Units: degrees
    pub left_turn_offset_deg: f64,

    /// Overshoot of a right turn, subtracted from every right turn target.
    ///
    /// Units: degrees
    pub right_turn_offset_deg: f64,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            forward_speed_mm_s: 150,
            reverse_speed_mm_s: 175,
            turn_speed_mm_s: 100,
            recovery_backoff_mm: 150.0,
            cliff_low_signal: 500,
            cliff_high_signal: 2500,
            left_turn_offset_deg: 12.0,
            right_turn_offset_deg: 14.0,
        }
    }
}
