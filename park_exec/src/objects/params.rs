//! Parameters structures for object detection and post classification

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the object detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectParams {
    /// IR raw value above which an object is considered present.
    pub ir_threshold: u16,

    /// An object must be strictly wider than this to be accepted.
    ///
    /// Units: degrees
    pub min_angular_width_deg: i32,

    /// Maximum number of objects kept from one sweep.
    pub max_objects: usize,

    /// How linear width is estimated from angular width and distance.
    pub width_model: WidthModel,
}

/// Parameters for the post classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostParams {
    /// Objects at or below this linear width are treated as parking zone posts.
    ///
    /// Units: centimeters
    pub narrow_post_max_width_cm: f64,

    /// Maximum number of posts kept from one sweep.
    pub max_posts: usize,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Linear width estimate.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum WidthModel {
    /// Arc length at the object's distance.
    Arc,

    /// Chord length at the object's distance.
    Chord,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for DetectParams {
    fn default() -> Self {
        Self {
            ir_threshold: 675,
            min_angular_width_deg: 4,
            max_objects: 15,
            width_model: WidthModel::Arc,
        }
    }
}

impl Default for PostParams {
    fn default() -> Self {
        Self {
            narrow_post_max_width_cm: 9.0,
            max_posts: 4,
        }
    }
}
