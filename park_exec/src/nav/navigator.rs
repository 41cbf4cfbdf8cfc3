//! Implementations for the Navigator state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use chrono::Utc;
use comms_if::{
    eqpt::{Drive, ScanHead},
    tc::ManualMnvr,
};
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::Arc;
use util::{archive::Archiver, module::State, session::Session};

// Internal
use super::{
    decide_autonomous, decide_parking,
    tm::{NullTm, SessionTm, SweepTm, TmSink},
    transition, MoveKind, NavDecision, NavError, NavState, ScanResult,
};
use crate::{
    cmd_flags::{CmdFlags, ModeSnapshot},
    gaps,
    motion::{recovery_turn, MotionCtrl, MoveStatus, TurnCmd, TurnDir},
    objects::{ObjectDetector, PostClassifier, PostZone},
    params::ParkExecParams,
    scan::Sweeper,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The navigator, owning the scan head and the motion controller.
pub struct Navigator<H: ScanHead, D: Drive> {
    params: ParkExecParams,

    flags: Arc<CmdFlags>,

    head: H,
    sweeper: Sweeper,
    detector: ObjectDetector,
    classifier: PostClassifier,
    motion: MotionCtrl<D>,

    post_zone: PostZone,
    state: NavState,
    num_cycles: u64,

    tm: Box<dyn TmSink>,
    arch_status: Archiver,
}

/// Output of one navigation cycle.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize)]
pub struct CycleOutput {
    pub state: NavState,
    pub decision: Option<NavDecision>,
    pub move_status: Option<MoveStatus>,

    /// The operator has stopped the run and the main loop should exit.
    pub terminated: bool,
}

/// Status report for one navigation cycle.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize)]
pub struct StatusReport {
    pub cycle: u64,
    pub state: NavState,
    pub num_objects: usize,
    pub num_gaps: usize,
    pub num_posts: usize,
    pub post_zone: bool,
    pub move_status: Option<MoveStatus>,
    pub recovery_turn: Option<TurnDir>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<H: ScanHead, D: Drive> Navigator<H, D> {
    /// Create a new navigator. Until `init` is called telemetry is dropped and nothing is
    /// archived.
    pub fn new(params: ParkExecParams, flags: Arc<CmdFlags>, head: H, drive: D) -> Self {
        Self {
            sweeper: Sweeper::new(params.sweep.clone()),
            detector: ObjectDetector::new(params.detect.clone()),
            classifier: PostClassifier::new(params.posts.clone()),
            motion: MotionCtrl::new(params.motion.clone(), drive),
            params,
            flags,
            head,
            post_zone: PostZone::default(),
            state: NavState::Idle,
            num_cycles: 0,
            tm: Box::new(NullTm),
            arch_status: Archiver::default(),
        }
    }

    /// Replace the telemetry sink.
    pub fn with_tm(mut self, tm: Box<dyn TmSink>) -> Self {
        self.tm = tm;
        self
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn post_zone_detected(&self) -> bool {
        self.post_zone.is_detected()
    }

    pub fn num_cycles(&self) -> u64 {
        self.num_cycles
    }

    pub fn head(&self) -> &H {
        &self.head
    }

    pub fn motion(&self) -> &MotionCtrl<D> {
        &self.motion
    }

    pub fn motion_mut(&mut self) -> &mut MotionCtrl<D> {
        &mut self.motion
    }

    fn log_transition(&self, prev: NavState) {
        match (prev, self.state) {
            (_, NavState::Stopped) => info!("Stopped, all motion ceased"),
            (NavState::Idle, NavState::Autonomous) => info!("Sequence started"),
            (_, NavState::Parking) => info!("Parking sequence initiated"),
            (NavState::Parking, NavState::Autonomous) => {
                info!("Parking sequence abandoned, resuming gap navigation")
            }
            (_, NavState::Manual) => info!("Navigator in manual mode"),
            (NavState::Manual, _) => info!("Navigator in autonomous mode"),
            (p, n) => debug!("Navigator state {} -> {}", p, n),
        }
    }

    /// Re-read the running flag between the primitives of a decision.
    fn still_running(&self) -> bool {
        let running = self.flags.is_running();

        if !running {
            info!("Stop received, skipping the rest of this cycle's motion");
        }

        running
    }

    /// Sweep and run the detection pipeline, updating the post zone flag.
    fn scan(&mut self, report: &mut StatusReport) -> Result<ScanResult, NavError> {
        let sweep = self.sweeper.sweep(&mut self.head)?;

        let objects = self.detector.detect(&sweep);
        let gaps = gaps::analyze(&objects);
        let posts = self.classifier.classify(&objects);

        self.post_zone.update(&posts);

        report.num_objects = objects.len();
        report.num_gaps = gaps.len();
        report.num_posts = posts.len();

        Ok(ScanResult {
            objects,
            gaps,
            posts,
        })
    }

    fn emit_tm(&mut self, scan: ScanResult, decision: Option<NavDecision>) {
        let tm = SweepTm {
            cycle: self.num_cycles,
            timestamp: Utc::now(),
            state: self.state,
            scan,
            post_zone: self.post_zone.is_detected(),
            decision,
        };

        if let Err(e) = self.tm.send(&tm) {
            warn!("Could not send sweep telemetry: {}", e);
        }
    }

    /// Turn, move forward, and recover from any event.
    ///
    /// Returns `None` if the run was stopped before the forward move.
    fn execute_move(
        &mut self,
        turn: Option<TurnCmd>,
        forward_mm: f64,
        report: &mut StatusReport,
    ) -> Result<Option<MoveStatus>, NavError> {
        if let Some(t) = turn {
            self.motion.exec_turn(&t)?;

            if !self.still_running() {
                return Ok(None);
            }
        }

        let status = self.motion.move_forward(forward_mm)?;

        if let Some(rt) = recovery_turn(status, self.params.nav.recovery_turn_deg) {
            if self.still_running() {
                self.motion.exec_turn(&rt)?;
                report.recovery_turn = Some(rt.dir);
            }
        }

        Ok(Some(status))
    }

    fn cycle_autonomous(
        &mut self,
        output: &mut CycleOutput,
        report: &mut StatusReport,
    ) -> Result<(), NavError> {
        let scan = self.scan(report)?;
        let decision =
            decide_autonomous(&scan, &self.params.nav, self.params.gaps.select_policy);

        debug!("Autonomous decision: {:?}", decision);

        output.decision = Some(decision);
        self.emit_tm(scan, Some(decision));

        match decision {
            NavDecision::Move {
                turn, forward_mm, ..
            } => output.move_status = self.execute_move(turn, forward_mm, report)?,
            NavDecision::EnterParkingSequence => {
                debug!("Posts in view, approaching on the next cycle")
            }
            NavDecision::ExitParkingSequence => (),
        }

        Ok(())
    }

    fn cycle_parking(
        &mut self,
        output: &mut CycleOutput,
        report: &mut StatusReport,
    ) -> Result<(), NavError> {
        let scan = self.scan(report)?;
        let decision = decide_parking(&scan.posts, &self.params.nav);

        debug!("Parking decision: {:?}", decision);

        output.decision = Some(decision);
        self.emit_tm(scan, Some(decision));

        match decision {
            NavDecision::Move {
                turn,
                forward_mm,
                kind,
            } => {
                let status = self.execute_move(turn, forward_mm, report)?;
                output.move_status = status;

                if kind == MoveKind::PostPassage && status == Some(MoveStatus::Complete) {
                    info!("Parking complete");
                    self.motion.stop()?;
                    self.post_zone.clear();
                    self.state = NavState::Parked;
                }
            }
            NavDecision::ExitParkingSequence => {
                info!("Lost sight of the parking zone posts");
                self.post_zone.clear();
            }
            NavDecision::EnterParkingSequence => (),
        }

        Ok(())
    }

    fn exec_manual(
        &mut self,
        mnvr: ManualMnvr,
        output: &mut CycleOutput,
        report: &mut StatusReport,
    ) -> Result<(), NavError> {
        info!("Manual manouvre: {:?}", mnvr);

        let step_mm = self.params.nav.manual_step_mm;
        let small_turn_deg = self.params.nav.manual_turn_deg;

        match mnvr {
            ManualMnvr::Forward => output.move_status = Some(self.motion.move_forward(step_mm)?),
            ManualMnvr::Backward => {
                // Turn around and step forward so the bump and cliff sensors stay in front
                self.motion.turn_exact(180.0, TurnDir::Left)?;
                if self.still_running() {
                    output.move_status = Some(self.motion.move_forward(step_mm)?);
                }
                if self.still_running() {
                    self.motion.turn_exact(180.0, TurnDir::Right)?;
                }
            }
            ManualMnvr::Left => {
                self.motion.turn_exact(small_turn_deg, TurnDir::Left)?;
            }
            ManualMnvr::Right => {
                self.motion.turn_exact(small_turn_deg, TurnDir::Right)?;
            }
            ManualMnvr::Left90 => {
                self.motion.turn_exact(90.0, TurnDir::Left)?;
            }
            ManualMnvr::Right90 => {
                self.motion.turn_exact(90.0, TurnDir::Right)?;
            }
            ManualMnvr::TurnAround => {
                self.motion.turn_exact(180.0, TurnDir::Left)?;
            }
            ManualMnvr::Rescan => {
                let scan = self.scan(report)?;
                self.emit_tm(scan, None);
            }
        }

        Ok(())
    }
}

impl<H: ScanHead, D: Drive> State for Navigator<H, D> {
    type InitData = ();
    type InitError = NavError;

    type InputData = ModeSnapshot;
    type OutputData = CycleOutput;
    type StatusReport = StatusReport;
    type ProcError = NavError;

    /// Open the session telemetry and archives.
    fn init(&mut self, _init_data: Self::InitData, session: &Session) -> Result<(), NavError> {
        self.tm = Box::new(SessionTm::new(session)?);
        self.arch_status = Archiver::from_path(session, "nav_status.csv")?;

        Ok(())
    }

    /// Run one navigation cycle.
    fn proc(
        &mut self,
        mode: &ModeSnapshot,
    ) -> Result<(CycleOutput, StatusReport), NavError> {
        self.num_cycles += 1;

        let mut output = CycleOutput::default();
        let mut report = StatusReport {
            cycle: self.num_cycles,
            ..Default::default()
        };

        let prev = self.state;
        self.state = transition(prev, mode, self.post_zone.is_detected());

        if self.state != prev {
            self.log_transition(prev);
        }

        match self.state {
            NavState::Idle => (),
            NavState::Stopped => {
                self.motion.stop()?;
                output.terminated = true;
            }
            NavState::Parked => self.motion.stop()?,
            NavState::Manual => {
                if let Some(m) = mode.mnvr {
                    self.exec_manual(m, &mut output, &mut report)?;
                }
            }
            NavState::Autonomous => self.cycle_autonomous(&mut output, &mut report)?,
            NavState::Parking => self.cycle_parking(&mut output, &mut report)?,
        }

        output.state = self.state;
        report.state = self.state;
        report.post_zone = self.post_zone.is_detected();
        report.move_status = output.move_status;

        if self.arch_status.is_open() {
            if let Err(e) = self.arch_status.serialise(report) {
                warn!("Could not archive the navigator status: {}", e);
            }
        }

        Ok((output, report))
    }
}
