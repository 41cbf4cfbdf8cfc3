//! # Scan module
//!
//! A sweep moves the scan head across its full angular range in fixed steps, sampling both
//! sensors at each step. The resulting [`Sweep`] is indexed by angle and replaced wholesale on
//! every cycle.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod sweep;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::{EqptError, HeadReading};
use serde::{Deserialize, Serialize};

pub use params::*;
pub use sweep::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// First angle of a sweep.
pub const SWEEP_MIN_ANGLE_DEG: i32 = 0;

/// Last angle of a sweep.
pub const SWEEP_MAX_ANGLE_DEG: i32 = 180;

/// Angular step between samples.
pub const SWEEP_STEP_DEG: i32 = 2;

/// Number of samples in one sweep.
pub const NUM_SWEEP_SAMPLES: usize =
    ((SWEEP_MAX_ANGLE_DEG - SWEEP_MIN_ANGLE_DEG) / SWEEP_STEP_DEG + 1) as usize;

/// The angle pointing straight ahead of the robot.
pub const AHEAD_ANGLE_DEG: i32 = 90;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One sample of the sweep.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanSample {
    pub angle_deg: i32,
    pub ultrasonic_distance_cm: f64,
    pub infrared_raw: u16,
    pub infrared_distance_cm: f64,
}

/// A complete sweep, one sample per angular step from `SWEEP_MIN_ANGLE_DEG` to
/// `SWEEP_MAX_ANGLE_DEG` inclusive.
#[derive(Debug, Clone)]
pub struct Sweep {
    samples: [ScanSample; NUM_SWEEP_SAMPLES],
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur during a sweep.
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error("Scan head error: {0}")]
    ScanHeadError(#[from] EqptError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScanSample {
    /// Build a sample from a head reading taken at `angle_deg`.
    pub fn from_reading(angle_deg: i32, reading: &HeadReading) -> Self {
        Self {
            angle_deg,
            ultrasonic_distance_cm: reading.ultrasonic_distance_cm,
            infrared_raw: reading.infrared_raw,
            infrared_distance_cm: reading.infrared_distance_cm,
        }
    }

    /// The head reading this sample was taken from.
    pub fn reading(&self) -> HeadReading {
        HeadReading {
            ultrasonic_distance_cm: self.ultrasonic_distance_cm,
            infrared_raw: self.infrared_raw,
            infrared_distance_cm: self.infrared_distance_cm,
        }
    }
}

impl Sweep {
    /// Build a sweep by evaluating `f` at every sweep angle.
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(i32) -> HeadReading,
    {
        let mut samples = [ScanSample::default(); NUM_SWEEP_SAMPLES];

        for (i, s) in samples.iter_mut().enumerate() {
            let angle_deg = angle_of_index(i);
            *s = ScanSample::from_reading(angle_deg, &f(angle_deg));
        }

        Self { samples }
    }

    /// All samples, ordered by increasing angle.
    pub fn samples(&self) -> &[ScanSample] {
        &self.samples
    }

    /// Get the sample taken at the given angle, or `None` if the angle is not on the sweep grid.
    pub fn get(&self, angle_deg: i32) -> Option<&ScanSample> {
        index_of_angle(angle_deg).map(|i| &self.samples[i])
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Angle of the sample at the given index.
pub fn angle_of_index(index: usize) -> i32 {
    SWEEP_MIN_ANGLE_DEG + (index as i32) * SWEEP_STEP_DEG
}

/// Index of the sample at the given angle, or `None` if the angle is off the grid.
pub fn index_of_angle(angle_deg: i32) -> Option<usize> {
    if angle_deg < SWEEP_MIN_ANGLE_DEG
        || angle_deg > SWEEP_MAX_ANGLE_DEG
        || (angle_deg - SWEEP_MIN_ANGLE_DEG) % SWEEP_STEP_DEG != 0
    {
        return None;
    }

    Some(((angle_deg - SWEEP_MIN_ANGLE_DEG) / SWEEP_STEP_DEG) as usize)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
