//! Scripted equipment
//!
//! The scripted head replays prepared sweeps, and the scripted drive synthesises odometry from
//! the commanded wheel velocities with injectable bump and cliff events.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::{Drive, EqptError, HeadReading, OdomSample, ScanHead};
use std::collections::VecDeque;
use std::time::Duration;

use crate::scan::{Sweep, SWEEP_MAX_ANGLE_DEG, SWEEP_MIN_ANGLE_DEG};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Cliff signal of plain floor.
pub const FLOOR_CLIFF_SIGNAL: u16 = 1500;

/// Cliff signal of boundary tape.
pub const TAPE_CLIFF_SIGNAL: u16 = 2800;

/// Polls after which the scripted drive reports an error, so a broken test can't hang.
const MAX_SCRIPTED_POLLS: u64 = 100_000;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A scan head which replays a queue of sweeps.
///
/// A new sweep is taken from the queue each time the head is sent back to the start angle after
/// reaching the end angle. Once the queue is empty the last sweep is repeated.
#[derive(Debug, Clone)]
pub struct ScriptedHead {
    queue: VecDeque<Sweep>,
    current: Option<Sweep>,
    reached_end: bool,
    num_sweeps: usize,
}

/// A drive which synthesises odometry.
///
/// Straight motion advances by a fixed distance per poll, turns by a fixed angle per poll.
#[derive(Debug, Clone)]
pub struct ScriptedDrive {
    commands: Vec<(i16, i16)>,
    velocities: (i16, i16),
    mm_per_poll: f64,
    deg_per_poll: f64,
    forward_mm: f64,
    reverse_mm: f64,
    turn_deg: f64,
    events: Vec<ScriptedEvent>,
    num_polls: u64,
}

#[derive(Debug, Copy, Clone)]
struct ScriptedEvent {
    at_forward_mm: f64,
    event: DriveEvent,
    fired: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Events which can be injected into a scripted drive.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DriveEvent {
    BumpLeft,
    BumpRight,
    CliffLeft,
    CliffRight,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptedHead {
    pub fn new<I: IntoIterator<Item = Sweep>>(sweeps: I) -> Self {
        Self {
            queue: sweeps.into_iter().collect(),
            current: None,
            reached_end: false,
            num_sweeps: 0,
        }
    }

    /// Add a sweep to the end of the queue.
    pub fn push(&mut self, sweep: Sweep) {
        self.queue.push_back(sweep);
    }

    /// Number of sweeps started so far.
    pub fn num_sweeps(&self) -> usize {
        self.num_sweeps
    }
}

impl ScanHead for ScriptedHead {
    fn sweep_to(&mut self, angle_deg: i32) -> Result<HeadReading, EqptError> {
        if angle_deg < SWEEP_MIN_ANGLE_DEG || angle_deg > SWEEP_MAX_ANGLE_DEG {
            return Err(EqptError::InvalidAngle(angle_deg));
        }

        if angle_deg == SWEEP_MIN_ANGLE_DEG && (self.current.is_none() || self.reached_end) {
            if let Some(next) = self.queue.pop_front() {
                self.current = Some(next);
            }
            self.reached_end = false;
            self.num_sweeps += 1;
        }

        if angle_deg == SWEEP_MAX_ANGLE_DEG {
            self.reached_end = true;
        }

        let sweep = self
            .current
            .as_ref()
            .ok_or_else(|| EqptError::ReadFailed("no scripted sweeps".into()))?;

        sweep
            .get(angle_deg)
            .map(|s| s.reading())
            .ok_or_else(|| EqptError::ReadFailed(format!("no scripted sample at {} deg", angle_deg)))
    }

    fn settle(&mut self, _duration: Duration) {}
}

impl ScriptedDrive {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            velocities: (0, 0),
            mm_per_poll: 10.0,
            deg_per_poll: 1.0,
            forward_mm: 0.0,
            reverse_mm: 0.0,
            turn_deg: 0.0,
            events: Vec::new(),
            num_polls: 0,
        }
    }

    /// Inject an event which fires once the total forward travel reaches `at_forward_mm`.
    pub fn with_event(mut self, at_forward_mm: f64, event: DriveEvent) -> Self {
        self.events.push(ScriptedEvent {
            at_forward_mm,
            event,
            fired: false,
        });
        self
    }

    /// Every wheel velocity command received, in order.
    pub fn commands(&self) -> &[(i16, i16)] {
        &self.commands
    }

    /// Total forward travel.
    pub fn forward_mm(&self) -> f64 {
        self.forward_mm
    }

    /// Total reverse travel.
    pub fn reverse_mm(&self) -> f64 {
        self.reverse_mm
    }

    /// Net rotation, positive to the left.
    pub fn turn_deg(&self) -> f64 {
        self.turn_deg
    }

    /// Clear the recorded commands and travel, keeping any unfired events.
    pub fn reset_record(&mut self) {
        self.commands.clear();
        self.forward_mm = 0.0;
        self.reverse_mm = 0.0;
        self.turn_deg = 0.0;
    }
}

impl Default for ScriptedDrive {
    fn default() -> Self {
        Self::new()
    }
}

impl Drive for ScriptedDrive {
    fn set_wheel_velocities(&mut self, left: i16, right: i16) -> Result<(), EqptError> {
        self.commands.push((left, right));
        self.velocities = (left, right);
        Ok(())
    }

    fn poll_odometry(&mut self) -> Result<OdomSample, EqptError> {
        self.num_polls += 1;
        if self.num_polls > MAX_SCRIPTED_POLLS {
            return Err(EqptError::ReadFailed("scripted drive poll limit reached".into()));
        }

        let mut odom = OdomSample {
            cliff_front_left_signal: FLOOR_CLIFF_SIGNAL,
            cliff_left_signal: FLOOR_CLIFF_SIGNAL,
            cliff_front_right_signal: FLOOR_CLIFF_SIGNAL,
            cliff_right_signal: FLOOR_CLIFF_SIGNAL,
            ..Default::default()
        };

        let (left, right) = self.velocities;

        if left == 0 && right == 0 {
            return Ok(odom);
        }

        if left as i32 == -(right as i32) {
            let delta = if right > left {
                self.deg_per_poll
            } else {
                -self.deg_per_poll
            };
            self.turn_deg += delta;
            odom.angle_delta_deg = delta;
            return Ok(odom);
        }

        let sum = left as i32 + right as i32;
        let delta = if sum > 0 {
            self.mm_per_poll
        } else {
            -self.mm_per_poll
        };
        odom.distance_delta_mm = delta;

        if delta < 0.0 {
            self.reverse_mm -= delta;
            return Ok(odom);
        }

        self.forward_mm += delta;

        let forward_mm = self.forward_mm;
        for e in self
            .events
            .iter_mut()
            .filter(|e| !e.fired && forward_mm >= e.at_forward_mm)
        {
            e.fired = true;
            match e.event {
                DriveEvent::BumpLeft => odom.bump_left = true,
                DriveEvent::BumpRight => odom.bump_right = true,
                DriveEvent::CliffLeft => odom.cliff_left_signal = TAPE_CLIFF_SIGNAL,
                DriveEvent::CliffRight => odom.cliff_front_right_signal = TAPE_CLIFF_SIGNAL,
            }
        }

        Ok(odom)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
