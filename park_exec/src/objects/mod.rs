//! # Object detection module
//!
//! Segments a sweep into discrete objects. An object is a contiguous run of samples whose IR
//! reading exceeds the detection threshold. The IR sensor is only used for presence, the object's
//! distance comes from the ultrasonic sensor at the object's centre.
//!
//! Runs narrower than the minimum angular width are rejected as noise. A run which is still above
//! threshold at the last sample is closed at the last sample's angle.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod posts;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use util::maths::{arc_length, chord_length, round_up_to_step};

// Internal
use crate::scan::{Sweep, SWEEP_STEP_DEG};

pub use params::*;
pub use posts::*;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An object found in a sweep.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    pub center_angle_deg: i32,
    pub distance_cm: f64,
    pub angular_width_deg: i32,
    pub linear_width_cm: f64,
}

/// The object detector.
#[derive(Debug, Clone, Default)]
pub struct ObjectDetector {
    params: DetectParams,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ObjectDetector {
    pub fn new(params: DetectParams) -> Self {
        Self { params }
    }

    /// Detect all objects in the sweep, ordered by increasing centre angle.
    ///
    /// This is a pure function of the sweep, running it twice on the same sweep gives the same
    /// objects.
    pub fn detect(&self, sweep: &Sweep) -> Vec<DetectedObject> {
        let mut objects = Vec::new();
        let mut start_deg: Option<i32> = None;

        for s in sweep.samples() {
            let present = s.infrared_raw > self.params.ir_threshold;

            match (start_deg, present) {
                (None, true) => start_deg = Some(s.angle_deg),
                (Some(start), false) => {
                    self.close(sweep, start, s.angle_deg, &mut objects);
                    start_deg = None;
                }
                _ => (),
            }
        }

        // Trailing object, still above threshold at the end of the sweep. It closes at the last
        // sample rather than after it, so it measures one step narrower than the same run would
        // mid-sweep.
        if let (Some(start), Some(last)) = (start_deg, sweep.samples().last()) {
            self.close(sweep, start, last.angle_deg, &mut objects);
        }

        if !objects.is_empty() {
            debug!("Detected {} objects:", objects.len());
            for (i, o) in objects.iter().enumerate() {
                debug!(
                    "    {:>2}: {:>3} deg, {:>6.1} cm, {:>3} deg wide, {:>6.1} cm wide",
                    i,
                    o.center_angle_deg,
                    o.distance_cm,
                    o.angular_width_deg,
                    o.linear_width_cm
                );
            }
        }

        objects
    }

    /// Close the object spanning `[start_deg, end_deg)` and push it if it's accepted.
    fn close(
        &self,
        sweep: &Sweep,
        start_deg: i32,
        end_deg: i32,
        objects: &mut Vec<DetectedObject>,
    ) {
        let angular_width_deg = end_deg - start_deg;

        if angular_width_deg <= self.params.min_angular_width_deg {
            return;
        }

        if objects.len() >= self.params.max_objects {
            warn!(
                "Object capacity ({}) reached, ignoring object at {}-{} deg",
                self.params.max_objects, start_deg, end_deg
            );
            return;
        }

        let center_angle_deg = round_up_to_step((start_deg + end_deg) / 2, SWEEP_STEP_DEG);

        // The centre is always between start and end so it's on the sweep.
        let distance_cm = match sweep.get(center_angle_deg) {
            Some(s) => s.ultrasonic_distance_cm,
            None => return,
        };

        let linear_width_cm = match self.params.width_model {
            WidthModel::Arc => arc_length(distance_cm, angular_width_deg as f64),
            WidthModel::Chord => chord_length(distance_cm, angular_width_deg as f64),
        };

        objects.push(DetectedObject {
            center_angle_deg,
            distance_cm,
            angular_width_deg,
            linear_width_cm,
        });
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::eqpt::HeadReading;

    /// Build a sweep with the given `(first_deg, last_deg, distance_cm)` spans above threshold.
    /// Both ends of each span are inclusive.
    fn sweep_with(spans: &[(i32, i32, f64)]) -> Sweep {
        Sweep::from_fn(|a| {
            match spans.iter().find(|(s, e, _)| a >= *s && a <= *e) {
                Some((_, _, d)) => HeadReading {
                    ultrasonic_distance_cm: *d,
                    infrared_raw: 900,
                    infrared_distance_cm: 30.0,
                },
                None => HeadReading {
                    ultrasonic_distance_cm: 200.0,
                    infrared_raw: 300,
                    infrared_distance_cm: 90.0,
                },
            }
        })
    }

    #[test]
    fn test_empty_sweep() {
        let objects = ObjectDetector::default().detect(&sweep_with(&[]));
        assert!(objects.is_empty());
    }

    #[test]
    fn test_single_span() {
        let det = ObjectDetector::default();

        // Spans of various widths, all wider than 4 deg
        for &(first, last) in [(80, 98), (10, 16), (100, 140), (50, 54), (2, 20)].iter() {
            let objects = det.detect(&sweep_with(&[(first, last, 50.0)]));

            let end = last + SWEEP_STEP_DEG;
            let mid = round_up_to_step((first + end) / 2, SWEEP_STEP_DEG);

            assert_eq!(objects.len(), 1, "span {}-{}", first, last);
            assert_eq!(objects[0].center_angle_deg, mid);
            assert_eq!(objects[0].angular_width_deg, end - first);
            assert_eq!(objects[0].distance_cm, 50.0);
        }
    }

    #[test]
    fn test_centered_object() {
        // 20 deg wide centered on 90
        let objects = ObjectDetector::default().detect(&sweep_with(&[(80, 98, 50.0)]));

        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].center_angle_deg, 90);
        assert_eq!(objects[0].angular_width_deg, 20);

        let expected = 2.0 * std::f64::consts::PI * 50.0 * (20.0 / 360.0);
        assert!((objects[0].linear_width_cm - expected).abs() < 1e-9);
    }

    #[test]
    fn test_noise_rejected() {
        // Single and double sample blips are 2 and 4 deg wide
        let objects = ObjectDetector::default().detect(&sweep_with(&[(30, 30, 40.0), (60, 62, 40.0)]));
        assert!(objects.is_empty());
    }

    #[test]
    fn test_trailing_object() {
        let objects = ObjectDetector::default().detect(&sweep_with(&[(170, 180, 60.0)]));

        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].angular_width_deg, 10);
        assert_eq!(objects[0].center_angle_deg, 176);
    }

    #[test]
    fn test_trailing_object_one_step_narrower() {
        let det = ObjectDetector::default();

        // Three samples mid-sweep span 6 deg and are kept
        let mid = det.detect(&sweep_with(&[(100, 104, 60.0)]));
        assert_eq!(mid.len(), 1);
        assert_eq!(mid[0].angular_width_deg, 6);

        // The same three samples at the end of the sweep span only 4 deg and are rejected
        assert!(det.detect(&sweep_with(&[(176, 180, 60.0)])).is_empty());

        // Four samples at the end are kept with the width of three mid-sweep
        let edge = det.detect(&sweep_with(&[(174, 180, 60.0)]));
        assert_eq!(edge.len(), 1);
        assert_eq!(edge[0].angular_width_deg, 6);
        assert_eq!(edge[0].center_angle_deg, 178);
    }

    #[test]
    fn test_ordering_and_idempotence() {
        let sweep = sweep_with(&[(20, 30, 40.0), (80, 90, 70.0), (140, 150, 60.0)]);
        let det = ObjectDetector::default();

        let a = det.detect(&sweep);
        let b = det.detect(&sweep);

        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        assert!(a.windows(2).all(|w| w[0].center_angle_deg < w[1].center_angle_deg));
    }

    #[test]
    fn test_capacity() {
        let det = ObjectDetector::new(DetectParams {
            max_objects: 2,
            ..Default::default()
        });

        let objects = det.detect(&sweep_with(&[(10, 20, 40.0), (40, 50, 40.0), (70, 80, 40.0)]));

        assert_eq!(objects.len(), 2);
        assert_eq!(objects[1].center_angle_deg, 46);
    }

    #[test]
    fn test_chord_model() {
        let det = ObjectDetector::new(DetectParams {
            width_model: WidthModel::Chord,
            ..Default::default()
        });

        let objects = det.detect(&sweep_with(&[(80, 98, 50.0)]));

        let expected = 2.0 * 50.0 * (10f64).to_radians().sin();
        assert!((objects[0].linear_width_cm - expected).abs() < 1e-9);
    }
}
