//! # Gap module
//!
//! A gap is the space between two angularly adjacent objects. Its distance is the nearer of the
//! two objects, and its width is the chord across the objects' angular separation at that
//! distance.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod select;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;
use serde::{Deserialize, Serialize};
use util::maths::chord_length;

use crate::objects::DetectedObject;

pub use params::*;
pub use select::*;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A gap between two objects.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub center_angle_deg: i32,
    pub linear_width_cm: f64,
    pub distance_cm: f64,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Find the gaps between the objects, which must be ordered by angle.
///
/// Returns one fewer gap than there are objects, or no gaps if there are fewer than two objects.
pub fn analyze(objects: &[DetectedObject]) -> Vec<Gap> {
    let gaps: Vec<Gap> = objects
        .windows(2)
        .map(|pair| {
            let (a, b) = (&pair[0], &pair[1]);

            let distance_cm = a.distance_cm.min(b.distance_cm);
            let separation_deg = (b.center_angle_deg - a.center_angle_deg) as f64;

            Gap {
                center_angle_deg: (a.center_angle_deg + b.center_angle_deg) / 2,
                linear_width_cm: chord_length(distance_cm, separation_deg),
                distance_cm,
            }
        })
        .collect();

    for (i, g) in gaps.iter().enumerate() {
        debug!(
            "Gap {:>2}: {:>3} deg, {:>6.1} cm wide, {:>6.1} cm away",
            i, g.center_angle_deg, g.linear_width_cm, g.distance_cm
        );
    }

    gaps
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
