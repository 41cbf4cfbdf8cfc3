//! # Post classification
//!
//! Narrow objects mark the edges of the parking zone. The classifier picks them out of each
//! sweep's objects, and [`PostZone`] tracks whether the zone is currently in sight.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::{DetectedObject, PostParams};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A narrow object which is likely a parking zone post.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostCandidate {
    pub angle_deg: i32,
    pub distance_cm: f64,
}

/// Picks posts out of a sweep's objects.
#[derive(Debug, Clone, Default)]
pub struct PostClassifier {
    params: PostParams,
}

/// Tracks whether the parking zone is in sight.
///
/// The flag is set by any sweep that finds a post and only cleared by a sweep that finds none.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostZone {
    detected: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PostClassifier {
    pub fn new(params: PostParams) -> Self {
        Self { params }
    }

    /// Classify the objects, returning the posts in angular order.
    pub fn classify(&self, objects: &[DetectedObject]) -> Vec<PostCandidate> {
        let mut posts = Vec::new();

        for o in objects
            .iter()
            .filter(|o| o.linear_width_cm <= self.params.narrow_post_max_width_cm)
        {
            if posts.len() >= self.params.max_posts {
                warn!(
                    "Post capacity ({}) reached, ignoring post at {} deg",
                    self.params.max_posts, o.center_angle_deg
                );
                break;
            }

            posts.push(PostCandidate {
                angle_deg: o.center_angle_deg,
                distance_cm: o.distance_cm,
            });
        }

        if !posts.is_empty() {
            debug!("Posts: {:?}", posts);
        }

        posts
    }
}

impl PostZone {
    /// Update the flag from a sweep's posts.
    pub fn update(&mut self, posts: &[PostCandidate]) {
        let detected = !posts.is_empty();

        if detected && !self.detected {
            info!("Parking zone posts detected");
        } else if !detected && self.detected {
            info!("Parking zone posts lost");
        }

        self.detected = detected;
    }

    pub fn is_detected(&self) -> bool {
        self.detected
    }

    pub fn clear(&mut self) {
        self.detected = false;
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
