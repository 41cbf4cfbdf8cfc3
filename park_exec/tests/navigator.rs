//! Navigator integration tests, driving whole cycles against scripted equipment.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::{
    eqpt::{Drive, EqptError, HeadReading, OdomSample},
    tc::{ManualMnvr, OperatorCmd},
};
use park_lib::{
    cmd_flags::CmdFlags,
    motion::{MoveStatus, TurnCmd, TurnDir},
    nav::{tm::VecTm, MoveKind, NavDecision, NavState, Navigator},
    params::ParkExecParams,
    scan::Sweep,
    sim::{DriveEvent, ScriptedDrive, ScriptedHead},
};
use std::sync::Arc;
use util::module::State;

// ---------------------------------------------------------------------------
// HELPERS
// ---------------------------------------------------------------------------

/// Build a sweep with the given `(first_deg, last_deg, distance_cm)` spans above threshold.
fn sweep_with(spans: &[(i32, i32, f64)]) -> Sweep {
    Sweep::from_fn(|a| match spans.iter().find(|(s, e, _)| a >= *s && a <= *e) {
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
    })
}

/// Two narrow posts 40 cm away, centred on 64 and 120 deg.
fn posts_sweep() -> Sweep {
    sweep_with(&[(60, 64, 40.0), (116, 120, 40.0)])
}

/// Two wide objects 60 cm away, with a wide gap centred on 91 deg.
fn wide_gap_sweep() -> Sweep {
    sweep_with(&[(40, 50, 60.0), (130, 140, 60.0)])
}

fn navigator<D: Drive>(
    sweeps: Vec<Sweep>,
    drive: D,
) -> (Navigator<ScriptedHead, D>, Arc<CmdFlags>, VecTm) {
    let flags = Arc::new(CmdFlags::new());
    let tm = VecTm::new();

    let nav = Navigator::new(
        ParkExecParams::default(),
        flags.clone(),
        ScriptedHead::new(sweeps),
        drive,
    )
    .with_tm(Box::new(tm.clone()));

    (nav, flags, tm)
}

fn cycle<D: Drive>(
    nav: &mut Navigator<ScriptedHead, D>,
    flags: &CmdFlags,
) -> (park_lib::nav::CycleOutput, park_lib::nav::StatusReport) {
    nav.proc(&flags.take()).unwrap()
}

/// Drive which latches a stop the first time it's polled.
struct StoppingDrive {
    inner: ScriptedDrive,
    flags: Arc<CmdFlags>,
}

impl Drive for StoppingDrive {
    fn set_wheel_velocities(&mut self, left: i16, right: i16) -> Result<(), EqptError> {
        self.inner.set_wheel_velocities(left, right)
    }

    fn poll_odometry(&mut self) -> Result<OdomSample, EqptError> {
        self.flags.latch(OperatorCmd::Stop);
        self.inner.poll_odometry()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[test]
fn test_idle_until_go() {
    let (mut nav, flags, tm) = navigator(vec![sweep_with(&[])], ScriptedDrive::new());

    let (out, rpt) = cycle(&mut nav, &flags);

    assert_eq!(out.state, NavState::Idle);
    assert_eq!(out.decision, None);
    assert!(!out.terminated);
    assert_eq!(rpt.cycle, 1);
    assert_eq!(nav.head().num_sweeps(), 0);
    assert!(nav.motion().drive().commands().is_empty());
    assert!(tm.sent().is_empty());

    // Stopping before starting leaves the navigator idle
    flags.latch(OperatorCmd::Stop);
    let (out, _) = cycle(&mut nav, &flags);
    assert_eq!(out.state, NavState::Idle);
    assert!(!out.terminated);
}

#[test]
fn test_single_object_ahead() {
    // A 20 deg wide object straight ahead at 50 cm
    let (mut nav, flags, tm) = navigator(vec![sweep_with(&[(80, 98, 50.0)])], ScriptedDrive::new());

    flags.latch(OperatorCmd::Go);
    let (out, rpt) = cycle(&mut nav, &flags);

    assert_eq!(out.state, NavState::Autonomous);
    assert_eq!(
        out.decision,
        Some(NavDecision::Move {
            turn: None,
            forward_mm: 350.0,
            kind: MoveKind::Probe
        })
    );
    assert_eq!(out.move_status, Some(MoveStatus::Complete));

    assert_eq!(rpt.num_objects, 1);
    assert_eq!(rpt.num_gaps, 0);
    assert_eq!(rpt.num_posts, 0);
    assert!(!rpt.post_zone);

    let drive = nav.motion().drive();
    assert_eq!(drive.commands(), &[(150, 150), (0, 0)]);
    assert_eq!(drive.forward_mm(), 350.0);
    assert_eq!(drive.turn_deg(), 0.0);

    let sent = tm.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].cycle, 1);
    assert_eq!(sent[0].scan.objects[0].center_angle_deg, 90);
    assert_eq!(sent[0].decision, out.decision);
}

#[test]
fn test_single_object_right_turns_left() {
    // Object at 130 deg is on the left of the robot
    let (mut nav, flags, _) = navigator(vec![sweep_with(&[(120, 140, 50.0)])], ScriptedDrive::new());

    flags.latch(OperatorCmd::Go);
    let (out, _) = cycle(&mut nav, &flags);

    assert_eq!(
        out.decision,
        Some(NavDecision::Move {
            turn: Some(TurnCmd {
                dir: TurnDir::Left,
                angle_deg: 30.0
            }),
            forward_mm: 350.0,
            kind: MoveKind::Probe
        })
    );

    // 30 deg less the left offset
    assert_eq!(nav.motion().drive().turn_deg(), 18.0);
    assert_eq!(nav.motion().drive().forward_mm(), 350.0);
}

#[test]
fn test_wide_gap_commit() {
    let (mut nav, flags, tm) = navigator(vec![wide_gap_sweep()], ScriptedDrive::new());

    flags.latch(OperatorCmd::Go);
    let (out, rpt) = cycle(&mut nav, &flags);

    assert_eq!(rpt.num_objects, 2);
    assert_eq!(rpt.num_gaps, 1);

    match out.decision {
        Some(NavDecision::Move {
            turn,
            forward_mm,
            kind,
        }) => {
            assert_eq!(kind, MoveKind::GapCommit);
            assert_eq!(
                turn,
                Some(TurnCmd {
                    dir: TurnDir::Left,
                    angle_deg: 1.0
                })
            );
            assert_eq!(forward_mm, 700.0);
        }
        d => panic!("Expected a gap commit, got {:?}", d),
    }

    // The 1 deg turn is within the offset so the robot is nudged
    assert_eq!(nav.motion().drive().turn_deg(), 6.0);
    assert_eq!(nav.motion().drive().forward_mm(), 700.0);
    assert_eq!(tm.sent()[0].scan.gaps[0].center_angle_deg, 91);
}

#[test]
fn test_narrow_gap_creep() {
    let (mut nav, flags, _) = navigator(
        vec![sweep_with(&[(70, 80, 60.0), (100, 110, 60.0)])],
        ScriptedDrive::new(),
    );

    flags.latch(OperatorCmd::Go);
    let (out, _) = cycle(&mut nav, &flags);

    match out.decision {
        Some(NavDecision::Move {
            forward_mm, kind, ..
        }) => {
            assert_eq!(kind, MoveKind::Creep);
            assert_eq!(forward_mm, 100.0);
        }
        d => panic!("Expected a creep, got {:?}", d),
    }

    assert_eq!(nav.motion().drive().forward_mm(), 100.0);
}

#[test]
fn test_bump_recovery() {
    let drive = ScriptedDrive::new().with_event(100.0, DriveEvent::BumpLeft);
    let (mut nav, flags, _) = navigator(vec![sweep_with(&[])], drive);

    flags.latch(OperatorCmd::Go);
    let (out, rpt) = cycle(&mut nav, &flags);

    assert_eq!(out.move_status, Some(MoveStatus::BumpedLeft));
    assert_eq!(rpt.recovery_turn, Some(TurnDir::Right));

    let drive = nav.motion().drive();
    assert_eq!(drive.forward_mm(), 100.0);
    assert_eq!(drive.reverse_mm(), 150.0);

    // 90 deg less the right offset
    assert_eq!(drive.turn_deg(), -76.0);

    // Next cycle sweeps again rather than carrying on
    let (out, rpt) = cycle(&mut nav, &flags);
    assert_eq!(out.move_status, Some(MoveStatus::Complete));
    assert_eq!(rpt.recovery_turn, None);
    assert_eq!(nav.head().num_sweeps(), 2);
}

#[test]
fn test_cliff_recovery() {
    let drive = ScriptedDrive::new().with_event(50.0, DriveEvent::CliffRight);
    let (mut nav, flags, _) = navigator(vec![sweep_with(&[])], drive);

    flags.latch(OperatorCmd::Go);
    let (out, rpt) = cycle(&mut nav, &flags);

    assert_eq!(out.move_status, Some(MoveStatus::CliffRight));
    assert_eq!(rpt.recovery_turn, Some(TurnDir::Left));
    assert_eq!(nav.motion().drive().turn_deg(), 78.0);
}

#[test]
fn test_parking_sequence() {
    let (mut nav, flags, tm) = navigator(vec![posts_sweep()], ScriptedDrive::new());

    flags.latch(OperatorCmd::Go);

    // Posts seen, no motion this cycle
    let (out, rpt) = cycle(&mut nav, &flags);
    assert_eq!(out.state, NavState::Autonomous);
    assert_eq!(out.decision, Some(NavDecision::EnterParkingSequence));
    assert_eq!(out.move_status, None);
    assert_eq!(rpt.num_posts, 2);
    assert!(rpt.post_zone);
    assert!(nav.motion().drive().commands().is_empty());

    // Pass between the posts
    let (out, rpt) = cycle(&mut nav, &flags);
    assert_eq!(
        out.decision,
        Some(NavDecision::Move {
            turn: Some(TurnCmd {
                dir: TurnDir::Left,
                angle_deg: 2.0
            }),
            forward_mm: 400.0,
            kind: MoveKind::PostPassage
        })
    );
    assert_eq!(out.move_status, Some(MoveStatus::Complete));
    assert_eq!(out.state, NavState::Parked);
    assert!(!rpt.post_zone);
    assert!(!nav.post_zone_detected());
    assert_eq!(nav.motion().drive().forward_mm(), 400.0);

    // Parked, no more sweeps or motion
    let (out, _) = cycle(&mut nav, &flags);
    assert_eq!(out.state, NavState::Parked);
    assert_eq!(out.decision, None);
    assert_eq!(nav.head().num_sweeps(), 2);
    assert_eq!(nav.motion().drive().forward_mm(), 400.0);
    assert_eq!(tm.sent().len(), 2);
}

#[test]
fn test_parking_bump_recovery() {
    let drive = ScriptedDrive::new().with_event(100.0, DriveEvent::BumpRight);
    let (mut nav, flags, _) = navigator(vec![posts_sweep()], drive);

    flags.latch(OperatorCmd::Go);
    cycle(&mut nav, &flags);

    // Bumped while passing between the posts, recovers the same way as in autonomous mode
    let (out, rpt) = cycle(&mut nav, &flags);
    assert_eq!(out.state, NavState::Parking);
    assert_eq!(out.move_status, Some(MoveStatus::BumpedRight));
    assert_eq!(rpt.recovery_turn, Some(TurnDir::Left));
    assert!(rpt.post_zone);
    assert!(nav.post_zone_detected());

    let drive = nav.motion().drive();
    assert_eq!(drive.forward_mm(), 100.0);
    assert_eq!(drive.reverse_mm(), 150.0);

    // 6 deg nudge towards the posts then 90 deg less the left offset
    assert_eq!(drive.turn_deg(), 84.0);

    // The passage is retried from a fresh sweep
    let (out, _) = cycle(&mut nav, &flags);
    assert_eq!(out.move_status, Some(MoveStatus::Complete));
    assert_eq!(out.state, NavState::Parked);
    assert_eq!(nav.head().num_sweeps(), 3);
}

#[test]
fn test_parking_abandoned() {
    let (mut nav, flags, _) = navigator(vec![posts_sweep(), sweep_with(&[])], ScriptedDrive::new());

    flags.latch(OperatorCmd::Go);

    cycle(&mut nav, &flags);
    assert!(nav.post_zone_detected());

    let (out, _) = cycle(&mut nav, &flags);
    assert_eq!(out.state, NavState::Parking);
    assert_eq!(out.decision, Some(NavDecision::ExitParkingSequence));
    assert!(!nav.post_zone_detected());

    let (out, _) = cycle(&mut nav, &flags);
    assert_eq!(out.state, NavState::Autonomous);
    assert_eq!(
        out.decision,
        Some(NavDecision::Move {
            turn: None,
            forward_mm: 350.0,
            kind: MoveKind::Probe
        })
    );
}

#[test]
fn test_single_post_approach() {
    // One post on the left at 40 cm
    let (mut nav, flags, _) = navigator(vec![sweep_with(&[(116, 120, 40.0)])], ScriptedDrive::new());

    flags.latch(OperatorCmd::Go);
    cycle(&mut nav, &flags);

    let (out, _) = cycle(&mut nav, &flags);
    assert_eq!(out.state, NavState::Parking);
    assert_eq!(
        out.decision,
        Some(NavDecision::Move {
            turn: Some(TurnCmd {
                dir: TurnDir::Left,
                angle_deg: 30.0
            }),
            forward_mm: 300.0,
            kind: MoveKind::PostApproach
        })
    );

    // Still looking for the second post
    assert!(nav.post_zone_detected());
}

#[test]
fn test_manual_mnvrs() {
    let (mut nav, flags, tm) = navigator(vec![sweep_with(&[(80, 98, 50.0)])], ScriptedDrive::new());

    flags.latch(OperatorCmd::Go);
    flags.latch(OperatorCmd::Manual);

    // No pending manouvre, nothing happens
    let (out, _) = cycle(&mut nav, &flags);
    assert_eq!(out.state, NavState::Manual);
    assert!(nav.motion().drive().commands().is_empty());

    flags.latch(OperatorCmd::Mnvr(ManualMnvr::Forward));
    let (out, _) = cycle(&mut nav, &flags);
    assert_eq!(out.move_status, Some(MoveStatus::Complete));
    assert_eq!(nav.motion().drive().forward_mm(), 100.0);

    // Manouvres are consumed once executed
    cycle(&mut nav, &flags);
    assert_eq!(nav.motion().drive().forward_mm(), 100.0);

    flags.latch(OperatorCmd::Mnvr(ManualMnvr::Left90));
    cycle(&mut nav, &flags);
    assert_eq!(nav.motion().drive().turn_deg(), 90.0);

    flags.latch(OperatorCmd::Mnvr(ManualMnvr::Right));
    cycle(&mut nav, &flags);
    assert_eq!(nav.motion().drive().turn_deg(), 80.0);

    flags.latch(OperatorCmd::Mnvr(ManualMnvr::Rescan));
    cycle(&mut nav, &flags);
    assert_eq!(nav.head().num_sweeps(), 1);

    let sent = tm.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].state, NavState::Manual);
    assert_eq!(sent[0].decision, None);

    // Back to autonomous
    flags.latch(OperatorCmd::Manual);
    let (out, _) = cycle(&mut nav, &flags);
    assert_eq!(out.state, NavState::Autonomous);
}

#[test]
fn test_manual_backward() {
    let (mut nav, flags, _) = navigator(vec![sweep_with(&[])], ScriptedDrive::new());

    flags.latch(OperatorCmd::Go);
    flags.latch(OperatorCmd::Manual);
    flags.latch(OperatorCmd::Mnvr(ManualMnvr::Backward));

    let (out, _) = cycle(&mut nav, &flags);
    assert_eq!(out.move_status, Some(MoveStatus::Complete));

    let drive = nav.motion().drive();
    assert_eq!(drive.forward_mm(), 100.0);
    assert_eq!(drive.reverse_mm(), 0.0);
    assert_eq!(drive.turn_deg(), 0.0);
}

#[test]
fn test_stop_terminates() {
    let (mut nav, flags, _) = navigator(vec![sweep_with(&[])], ScriptedDrive::new());

    flags.latch(OperatorCmd::Go);
    cycle(&mut nav, &flags);

    flags.latch(OperatorCmd::Stop);
    let (out, _) = cycle(&mut nav, &flags);
    assert_eq!(out.state, NavState::Stopped);
    assert!(out.terminated);
    assert_eq!(nav.motion().drive().commands().last(), Some(&(0, 0)));

    // Nothing restarts a stopped navigator
    flags.latch(OperatorCmd::Go);
    let (out, _) = cycle(&mut nav, &flags);
    assert_eq!(out.state, NavState::Stopped);
    assert!(out.terminated);
    assert_eq!(nav.head().num_sweeps(), 1);
}

#[test]
fn test_stop_between_primitives() {
    let flags = Arc::new(CmdFlags::new());
    let drive = StoppingDrive {
        inner: ScriptedDrive::new(),
        flags: flags.clone(),
    };

    let mut nav = Navigator::new(
        ParkExecParams::default(),
        flags.clone(),
        ScriptedHead::new(vec![wide_gap_sweep()]),
        drive,
    );

    flags.latch(OperatorCmd::Go);
    let (out, _) = nav.proc(&flags.take()).unwrap();

    // The turn ran, the forward move was skipped
    assert_eq!(out.move_status, None);
    assert_eq!(nav.motion().drive().inner.turn_deg(), 6.0);
    assert_eq!(nav.motion().drive().inner.forward_mm(), 0.0);

    let (out, _) = nav.proc(&flags.take()).unwrap();
    assert!(out.terminated);
}
