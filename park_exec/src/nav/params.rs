//! Parameters structure for the Navigator

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the navigator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavParams {
    // ---- GEOMETRY ----
    /// Width of the robot, gaps narrower than this are not committed to.
    ///
    /// Units: centimeters
    pub robot_width_cm: f64,

    // ---- AUTONOMOUS ----
    /// Distance moved when there are zero or one objects.
    ///
    /// Units: millimeters
    pub probe_distance_mm: f64,

    /// Turn made away from a single object.
    ///
    /// Units: degrees
    pub single_object_turn_deg: f64,

    /// Distance moved towards a gap which is too narrow to pass.
    ///
    /// Units: millimeters
    pub creep_distance_mm: f64,

    /// Distance driven past a gap's clearance when committing to it.
    ///
    /// Units: centimeters
    pub gap_overshoot_cm: f64,

    // ---- PARKING ----
    /// Distance short of a single post to stop at.
    ///
    /// Units: centimeters
    pub post_standoff_cm: f64,

    // ---- RECOVERY ----
    /// Turn made away from a bump or cliff.
    ///
    /// Units: degrees
    pub recovery_turn_deg: f64,

    // ---- MANUAL ----
    /// Distance of a manual step.
    ///
    /// Units: millimeters
    pub manual_step_mm: f64,

    /// Angle of a small manual turn.
    ///
    /// Units: degrees
    pub manual_turn_deg: f64,

    // ---- CYCLE ----
    /// Target period of one cycle of the main loop.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,
}

impl Default for NavParams {
    fn default() -> Self {
        Self {
            robot_width_cm: 35.0,
            probe_distance_mm: 350.0,
            single_object_turn_deg: 30.0,
            creep_distance_mm: 100.0,
            gap_overshoot_cm: 10.0,
            post_standoff_cm: 10.0,
            recovery_turn_deg: 90.0,
            manual_step_mm: 100.0,
            manual_turn_deg: 10.0,
            cycle_period_s: 0.1,
        }
    }
}
