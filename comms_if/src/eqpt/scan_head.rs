//! # Scan head interface
//!
//! The scan head carries an ultrasonic ranger and an IR proximity sensor on a servo mount.
//! Angles are in degrees, 0 and 180 are the extremes of the field of view and 90 is straight
//! ahead.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::EqptError;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A single reading from the head at one angle.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Default)]
pub struct HeadReading {
    pub ultrasonic_distance_cm: f64,
    pub infrared_raw: u16,
    pub infrared_distance_cm: f64,
}

/// Power law mapping between IR raw values and distances, `dist_cm = coeff * raw^exponent`.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct IrCalibration {
    pub coeff: f64,
    pub exponent: f64,
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A servo-mounted sensor head.
pub trait ScanHead {
    /// Point the head to the given angle, wait for it to settle, then sample both sensors.
    fn sweep_to(&mut self, angle_deg: i32) -> Result<HeadReading, EqptError>;

    /// Wait for the mount to come to rest after a long slew.
    fn settle(&mut self, duration: Duration) {
        std::thread::sleep(duration)
    }
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for IrCalibration {
    fn default() -> Self {
        Self {
            coeff: 30255.0,
            exponent: -1.01,
        }
    }
}

impl IrCalibration {
    /// Convert a raw IR value into a distance. A raw value of zero (nothing reflected) maps to
    /// infinity.
    pub fn to_distance_cm(&self, raw: u16) -> f64 {
        if raw == 0 {
            return std::f64::INFINITY;
        }

        self.coeff * (raw as f64).powf(self.exponent)
    }

    /// Convert a distance into the raw IR value the sensor would report, saturating at the
    /// sensor's range.
    pub fn to_raw(&self, distance_cm: f64) -> u16 {
        if distance_cm <= 0.0 {
            return std::u16::MAX;
        }
        if !distance_cm.is_finite() {
            return 0;
        }

        let raw = (distance_cm / self.coeff).powf(1.0 / self.exponent);

        if raw >= std::u16::MAX as f64 {
            std::u16::MAX
        } else {
            raw.round() as u16
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
