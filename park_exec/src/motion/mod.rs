//! # Motion control module
//!
//! Executes the robot's motion primitives against the drive's odometry:
//!
//! - [`MotionCtrl::move_forward`] - stops on bumps and cliffs, backs off, and reports the event.
//! - [`MotionCtrl::move_backward`] - reverses unconditionally, cliffs are only reported.
//! - [`MotionCtrl::turn`] - turns on the spot, compensating for the robot's overshoot.
//!
//! Primitives block until they finish. There is no timeout, a wheel which never reports any
//! travel will block the caller.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod recovery;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use comms_if::eqpt::{Drive, EqptError, OdomSample};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use params::*;
pub use recovery::*;
pub use state::*;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Motion controller, owning the drive.
pub struct MotionCtrl<D: Drive> {
    params: MotionParams,
    drive: D,
    state: MotionState,
}

/// A turn to execute.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnCmd {
    pub dir: TurnDir,

    /// Magnitude of the turn.
    ///
    /// Units: degrees
    pub angle_deg: f64,
}

/// Result of a backward move.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackwardReport {
    pub travelled_mm: f64,
    pub cliff_left: bool,
    pub cliff_right: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Direction of a turn.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum TurnDir {
    Left,
    Right,
}

/// Terminal status of a forward move.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum MoveStatus {
    Complete,
    BumpedLeft,
    BumpedRight,
    CliffLeft,
    CliffRight,
}

/// Terminal status of a turn.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum TurnStatus {
    /// The compensated target was turned.
    Complete,

    /// The target was within the turn offset, so only a half-offset nudge was made.
    Nudged,
}

/// Possible errors that can occur during MotionCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum MotionError {
    #[error("Drive error: {0}")]
    DriveError(#[from] EqptError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<D: Drive> MotionCtrl<D> {
    pub fn new(params: MotionParams, drive: D) -> Self {
        Self {
            params,
            drive,
            state: MotionState::Idle,
        }
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn params(&self) -> &MotionParams {
        &self.params
    }

    pub fn drive(&self) -> &D {
        &self.drive
    }

    /// Stop both wheels.
    pub fn stop(&mut self) -> Result<(), MotionError> {
        self.drive.stop()?;

        if self.state.is_active() {
            self.state = MotionState::Idle;
        }

        Ok(())
    }

    /// Move forward by the given distance.
    ///
    /// If a bump or cliff is detected the robot stops, reverses by the recovery backoff distance,
    /// and returns the event. The robot never continues forward after an event.
    pub fn move_forward(&mut self, distance_mm: f64) -> Result<MoveStatus, MotionError> {
        info!("Going forward {:.0} cm", distance_mm / 10.0);

        if distance_mm <= 0.0 {
            self.state = MotionState::Complete;
            return Ok(MoveStatus::Complete);
        }

        self.state = MotionState::Moving;

        let result = self.forward_until_event(distance_mm);
        let status = self.stop_on_error(result)?;

        if status != MoveStatus::Complete {
            self.move_backward(self.params.recovery_backoff_mm)?;
        }

        self.state = status.into();

        Ok(status)
    }

    /// Reverse by the given distance.
    ///
    /// Cliffs seen while reversing are logged and reported but do not stop the motion.
    pub fn move_backward(&mut self, distance_mm: f64) -> Result<BackwardReport, MotionError> {
        info!("Going backward {:.0} cm", distance_mm / 10.0);

        self.state = MotionState::Moving;

        let result = self.reverse(distance_mm);
        let report = self.stop_on_error(result)?;

        self.state = MotionState::Complete;

        Ok(report)
    }

    /// Turn on the spot by `angle_deg` in the given direction.
    ///
    /// The turn offset for the direction is subtracted from the target. If that leaves nothing to
    /// turn the robot is nudged by half the offset instead.
    pub fn turn(&mut self, angle_deg: f64, dir: TurnDir) -> Result<TurnStatus, MotionError> {
        info!("Turning {} {:.0} deg", dir, angle_deg);

        let offset = self.turn_offset(dir);
        let (status, target) = if angle_deg.abs() - offset <= 0.0 {
            (TurnStatus::Nudged, offset / 2.0)
        } else {
            (TurnStatus::Complete, angle_deg.abs() - offset)
        };

        self.state = MotionState::Turning;

        let result = self.turn_until(target, dir);
        self.stop_on_error(result)?;

        self.state = MotionState::Complete;

        Ok(status)
    }

    /// Turn by exactly `angle_deg`, adding the offset back so the overshoot completes the turn.
    pub fn turn_exact(&mut self, angle_deg: f64, dir: TurnDir) -> Result<TurnStatus, MotionError> {
        self.turn(angle_deg.abs() + self.turn_offset(dir), dir)
    }

    /// Execute a turn command.
    pub fn exec_turn(&mut self, cmd: &TurnCmd) -> Result<TurnStatus, MotionError> {
        self.turn(cmd.angle_deg, cmd.dir)
    }

    fn turn_offset(&self, dir: TurnDir) -> f64 {
        match dir {
            TurnDir::Left => self.params.left_turn_offset_deg,
            TurnDir::Right => self.params.right_turn_offset_deg,
        }
    }

    /// Check the odometry sample for events, in priority order.
    fn check_events(&self, odom: &OdomSample) -> Option<MoveStatus> {
        if odom.bump_left {
            Some(MoveStatus::BumpedLeft)
        } else if odom.bump_right {
            Some(MoveStatus::BumpedRight)
        } else if self.cliff_left(odom) {
            Some(MoveStatus::CliffLeft)
        } else if self.cliff_right(odom) {
            Some(MoveStatus::CliffRight)
        } else {
            None
        }
    }

    fn is_edge(&self, signal: u16) -> bool {
        signal < self.params.cliff_low_signal || signal > self.params.cliff_high_signal
    }

    fn cliff_left(&self, odom: &OdomSample) -> bool {
        self.is_edge(odom.cliff_front_left_signal) || self.is_edge(odom.cliff_left_signal)
    }

    fn cliff_right(&self, odom: &OdomSample) -> bool {
        self.is_edge(odom.cliff_front_right_signal) || self.is_edge(odom.cliff_right_signal)
    }

    fn forward_until_event(&mut self, distance_mm: f64) -> Result<MoveStatus, MotionError> {
        let speed = self.params.forward_speed_mm_s;
        self.drive.set_wheel_velocities(speed, speed)?;

        let mut travelled_mm = 0.0;

        while travelled_mm < distance_mm {
            let odom = self.drive.poll_odometry()?;
            travelled_mm += odom.distance_delta_mm;

            if let Some(event) = self.check_events(&odom) {
                warn!("{} after {:.0} mm", event, travelled_mm);
                self.drive.stop()?;
                return Ok(event);
            }
        }

        self.drive.stop()?;

        Ok(MoveStatus::Complete)
    }

    fn reverse(&mut self, distance_mm: f64) -> Result<BackwardReport, MotionError> {
        let speed = -self.params.reverse_speed_mm_s;
        self.drive.set_wheel_velocities(speed, speed)?;

        let mut report = BackwardReport::default();

        while report.travelled_mm < distance_mm {
            let odom = self.drive.poll_odometry()?;
            report.travelled_mm += odom.distance_delta_mm.abs();

            if self.cliff_left(&odom) && !report.cliff_left {
                warn!("Left cliff/bound detected while reversing");
                report.cliff_left = true;
            }
            if self.cliff_right(&odom) && !report.cliff_right {
                warn!("Right cliff/bound detected while reversing");
                report.cliff_right = true;
            }
        }

        self.drive.stop()?;

        Ok(report)
    }

    fn turn_until(&mut self, target_deg: f64, dir: TurnDir) -> Result<(), MotionError> {
        let speed = self.params.turn_speed_mm_s;

        // Positive angles are counter-clockwise, so left turns count up and right turns down.
        let (left, right, sign) = match dir {
            TurnDir::Left => (-speed, speed, 1.0),
            TurnDir::Right => (speed, -speed, -1.0),
        };

        self.drive.set_wheel_velocities(left, right)?;

        let mut turned_deg = 0.0;

        while turned_deg < target_deg {
            let odom = self.drive.poll_odometry()?;
            turned_deg += sign * odom.angle_delta_deg;
        }

        self.drive.stop()?;

        Ok(())
    }

    /// On error make a best effort attempt to stop the wheels before passing the error on.
    fn stop_on_error<T>(&mut self, result: Result<T, MotionError>) -> Result<T, MotionError> {
        if result.is_err() {
            if let Err(e) = self.drive.stop() {
                warn!("Could not stop the drive after a motion error: {}", e);
            }
            self.state = MotionState::Idle;
        }

        result
    }
}

impl fmt::Display for TurnDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnDir::Left => write!(f, "left"),
            TurnDir::Right => write!(f, "right"),
        }
    }
}

impl fmt::Display for MoveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveStatus::Complete => write!(f, "Move complete"),
            MoveStatus::BumpedLeft => write!(f, "Left bump detected"),
            MoveStatus::BumpedRight => write!(f, "Right bump detected"),
            MoveStatus::CliffLeft => write!(f, "Left cliff/bound detected"),
            MoveStatus::CliffRight => write!(f, "Right cliff/bound detected"),
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
