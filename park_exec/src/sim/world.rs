//! Simulated field
//!
//! The field is a rectangle bounded by tape, containing circular obstacles and narrow posts.
//! Positions are in centimeters with the origin at a corner of the field, and headings are
//! counter-clockwise from the field's x axis.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use comms_if::eqpt::{Drive, EqptError, HeadReading, IrCalibration, OdomSample, ScanHead};
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use util::maths::ang_diff_deg;

// Internal
use super::{FLOOR_CLIFF_SIGNAL, TAPE_CLIFF_SIGNAL};
use crate::scan::{AHEAD_ANGLE_DEG, SWEEP_MAX_ANGLE_DEG, SWEEP_MIN_ANGLE_DEG};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Bearings of the cliff sensors relative to the robot's heading, in the order front left, left,
/// front right, right.
const CLIFF_SENSOR_BEARINGS_DEG: [f64; 4] = [30.0, 80.0, -30.0, -80.0];

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters describing the simulated world, loaded from `sim_world.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimWorldParams {
    /// Size of the taped field.
    ///
    /// Units: centimeters
    pub field_size_cm: [f64; 2],

    pub robot_start_cm: [f64; 2],

    pub robot_start_heading_deg: f64,

    pub robot_radius_cm: f64,

    /// Distance between the wheels.
    ///
    /// Units: millimeters
    pub wheel_base_mm: f64,

    /// Time simulated by each odometry poll.
    ///
    /// Units: seconds
    pub poll_period_s: f64,

    /// Range reported by the ultrasonic sensor when nothing is hit.
    ///
    /// Units: centimeters
    pub ultrasonic_max_range_cm: f64,

    pub ir_calibration: IrCalibration,

    pub obstacles: Vec<SimBody>,

    pub posts: Vec<SimBody>,
}

/// A circular body in the world.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimBody {
    pub centre_cm: [f64; 2],
    pub radius_cm: f64,
}

/// Pose of the simulated robot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SimPose {
    pub position_cm: Point2<f64>,
    pub heading_rad: f64,
}

/// The simulated world.
#[derive(Debug, Clone)]
pub struct SimWorld {
    params: SimWorldParams,
    pose: SimPose,
    velocities: (i16, i16),
}

/// Scan head looking into a shared [`SimWorld`].
#[derive(Debug, Clone)]
pub struct SimHead {
    world: Arc<Mutex<SimWorld>>,
}

/// Drive moving the robot in a shared [`SimWorld`].
#[derive(Debug, Clone)]
pub struct SimDrive {
    world: Arc<Mutex<SimWorld>>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimBody {
    fn centre(&self) -> Point2<f64> {
        Point2::new(self.centre_cm[0], self.centre_cm[1])
    }
}

impl SimWorld {
    pub fn new(params: SimWorldParams) -> Self {
        let pose = SimPose {
            position_cm: Point2::new(params.robot_start_cm[0], params.robot_start_cm[1]),
            heading_rad: params.robot_start_heading_deg.to_radians(),
        };

        Self {
            params,
            pose,
            velocities: (0, 0),
        }
    }

    pub fn pose(&self) -> SimPose {
        self.pose
    }

    /// Split the world into a head and a drive which share it.
    pub fn split(self) -> (SimHead, SimDrive) {
        let world = Arc::new(Mutex::new(self));

        (
            SimHead {
                world: world.clone(),
            },
            SimDrive { world },
        )
    }

    /// Distance from `origin` along `bearing_rad` to the nearest body, if any is hit.
    pub fn raycast(&self, origin: &Point2<f64>, bearing_rad: f64) -> Option<f64> {
        let dir = Vector2::new(bearing_rad.cos(), bearing_rad.sin());
        let mut nearest: Option<f64> = None;

        for body in self.bodies() {
            let oc = body.centre() - *origin;
            let t_ca = oc.dot(&dir);
            let d2 = oc.norm_squared() - t_ca * t_ca;
            let r2 = body.radius_cm * body.radius_cm;

            if d2 > r2 {
                continue;
            }

            let thc = (r2 - d2).sqrt();
            let t = if t_ca - thc >= 0.0 {
                t_ca - thc
            } else if t_ca + thc >= 0.0 {
                0.0
            } else {
                continue;
            };

            nearest = Some(nearest.map_or(t, |n| n.min(t)));
        }

        nearest
    }

    /// Sample the head sensors with the head at `angle_deg`.
    pub fn read_head(&self, angle_deg: i32) -> HeadReading {
        let bearing = self.pose.heading_rad + ((angle_deg - AHEAD_ANGLE_DEG) as f64).to_radians();
        let max_range = self.params.ultrasonic_max_range_cm;

        let hit = self
            .raycast(&self.pose.position_cm, bearing)
            .filter(|d| *d < max_range);

        let cal = &self.params.ir_calibration;
        let infrared_raw = hit.map_or(0, |d| cal.to_raw(d));

        HeadReading {
            ultrasonic_distance_cm: hit.unwrap_or(max_range),
            infrared_raw,
            infrared_distance_cm: cal.to_distance_cm(infrared_raw),
        }
    }

    /// Advance the simulation by one poll period with the current wheel velocities.
    pub fn step(&mut self) -> OdomSample {
        let dt = self.params.poll_period_s;
        let (left, right) = (self.velocities.0 as f64, self.velocities.1 as f64);

        let travel_mm = 0.5 * (left + right) * dt;
        let rotation_rad = (right - left) / self.params.wheel_base_mm * dt;

        let mut odom = OdomSample::default();

        let dir = Vector2::new(self.pose.heading_rad.cos(), self.pose.heading_rad.sin());
        let next = self.pose.position_cm + dir * (travel_mm / 10.0);

        match self.collision(&next).filter(|_| travel_mm > 0.0) {
            Some(body) => {
                let to_body = body.centre() - self.pose.position_cm;
                let rel_deg = ang_diff_deg(
                    self.pose.heading_rad.to_degrees(),
                    to_body.y.atan2(to_body.x).to_degrees(),
                );

                if rel_deg >= 0.0 {
                    odom.bump_left = true;
                } else {
                    odom.bump_right = true;
                }
            }
            None => {
                self.pose.position_cm = next;
                odom.distance_delta_mm = travel_mm;
            }
        }

        self.pose.heading_rad += rotation_rad;
        odom.angle_delta_deg = rotation_rad.to_degrees();

        let signals: Vec<u16> = CLIFF_SENSOR_BEARINGS_DEG
            .iter()
            .map(|b| self.cliff_signal(*b))
            .collect();
        odom.cliff_front_left_signal = signals[0];
        odom.cliff_left_signal = signals[1];
        odom.cliff_front_right_signal = signals[2];
        odom.cliff_right_signal = signals[3];

        odom
    }

    fn bodies(&self) -> impl Iterator<Item = &SimBody> {
        self.params.obstacles.iter().chain(self.params.posts.iter())
    }

    fn collision(&self, position: &Point2<f64>) -> Option<SimBody> {
        let radius = self.params.robot_radius_cm;

        self.bodies()
            .find(|b| (b.centre() - *position).norm() < b.radius_cm + radius)
            .copied()
    }

    fn in_field(&self, p: &Point2<f64>) -> bool {
        p.x >= 0.0
            && p.y >= 0.0
            && p.x <= self.params.field_size_cm[0]
            && p.y <= self.params.field_size_cm[1]
    }

    fn cliff_signal(&self, rel_bearing_deg: f64) -> u16 {
        let bearing = self.pose.heading_rad + rel_bearing_deg.to_radians();
        let p = self.pose.position_cm
            + Vector2::new(bearing.cos(), bearing.sin()) * self.params.robot_radius_cm;

        if self.in_field(&p) {
            FLOOR_CLIFF_SIGNAL
        } else {
            TAPE_CLIFF_SIGNAL
        }
    }
}

impl Default for SimWorldParams {
    fn default() -> Self {
        Self {
            field_size_cm: [300.0, 300.0],
            robot_start_cm: [150.0, 30.0],
            robot_start_heading_deg: 90.0,
            robot_radius_cm: 17.5,
            wheel_base_mm: 235.0,
            poll_period_s: 0.015,
            ultrasonic_max_range_cm: 250.0,
            ir_calibration: IrCalibration::default(),
            obstacles: Vec::new(),
            posts: Vec::new(),
        }
    }
}

fn lock_world(world: &Arc<Mutex<SimWorld>>) -> Result<MutexGuard<'_, SimWorld>, EqptError> {
    world
        .lock()
        .map_err(|_| EqptError::ReadFailed("simulated world lock poisoned".into()))
}

impl SimHead {
    /// The world this head is looking into.
    pub fn world(&self) -> Arc<Mutex<SimWorld>> {
        self.world.clone()
    }
}

impl ScanHead for SimHead {
    fn sweep_to(&mut self, angle_deg: i32) -> Result<HeadReading, EqptError> {
        if angle_deg < SWEEP_MIN_ANGLE_DEG || angle_deg > SWEEP_MAX_ANGLE_DEG {
            return Err(EqptError::InvalidAngle(angle_deg));
        }

        Ok(lock_world(&self.world)?.read_head(angle_deg))
    }

    // The simulated head moves instantly.
    fn settle(&mut self, _duration: Duration) {}
}

impl Drive for SimDrive {
    fn set_wheel_velocities(&mut self, left: i16, right: i16) -> Result<(), EqptError> {
        lock_world(&self.world)?.velocities = (left, right);
        Ok(())
    }

    fn poll_odometry(&mut self) -> Result<OdomSample, EqptError> {
        Ok(lock_world(&self.world)?.step())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
