//! Navigation decisions
//!
//! Decisions are pure functions of one sweep's objects, gaps and posts.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::NavParams;
use crate::{
    gaps::{select_closest, Gap, SelectPolicy},
    motion::{TurnCmd, TurnDir},
    objects::{DetectedObject, PostCandidate},
    scan::AHEAD_ANGLE_DEG,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Everything derived from one sweep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub objects: Vec<DetectedObject>,
    pub gaps: Vec<Gap>,
    pub posts: Vec<PostCandidate>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The action chosen for a cycle.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum NavDecision {
    /// Optionally turn, then move forward.
    Move {
        turn: Option<TurnCmd>,
        forward_mm: f64,
        kind: MoveKind,
    },

    /// Posts were found, start the parking approach on the next cycle.
    EnterParkingSequence,

    /// No posts are visible any more, go back to following gaps.
    ExitParkingSequence,
}

/// Why a move was chosen.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum MoveKind {
    /// Zero or one objects in view.
    Probe,

    /// Driving through a gap the robot fits through.
    GapCommit,

    /// Edging towards a gap which is too narrow.
    Creep,

    /// Approaching a single post.
    PostApproach,

    /// Passing between two posts into the parking zone.
    PostPassage,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// The turn needed to face `angle_deg`, or `None` if it's already straight ahead.
pub fn turn_towards(angle_deg: i32) -> Option<TurnCmd> {
    let offset = angle_deg - AHEAD_ANGLE_DEG;

    if offset > 0 {
        Some(TurnCmd {
            dir: TurnDir::Left,
            angle_deg: offset as f64,
        })
    } else if offset < 0 {
        Some(TurnCmd {
            dir: TurnDir::Right,
            angle_deg: -offset as f64,
        })
    } else {
        None
    }
}

/// Decide what to do with an autonomous sweep.
pub fn decide_autonomous(scan: &ScanResult, params: &NavParams, policy: SelectPolicy) -> NavDecision {
    if !scan.posts.is_empty() {
        return NavDecision::EnterParkingSequence;
    }

    let probe = NavDecision::Move {
        turn: None,
        forward_mm: params.probe_distance_mm,
        kind: MoveKind::Probe,
    };

    match scan.objects.len() {
        0 => probe,
        1 => {
            let offset = scan.objects[0].center_angle_deg - AHEAD_ANGLE_DEG;

            let dir = if offset < 0 {
                Some(TurnDir::Right)
            } else if offset > 0 {
                Some(TurnDir::Left)
            } else {
                None
            };

            NavDecision::Move {
                turn: dir.map(|dir| TurnCmd {
                    dir,
                    angle_deg: params.single_object_turn_deg,
                }),
                forward_mm: params.probe_distance_mm,
                kind: MoveKind::Probe,
            }
        }
        _ => {
            let gap = match select_closest(&scan.gaps, policy) {
                Some(i) => scan.gaps[i],
                None => return probe,
            };

            let turn = turn_towards(gap.center_angle_deg);

            if gap.linear_width_cm >= params.robot_width_cm {
                NavDecision::Move {
                    turn,
                    forward_mm: (gap.distance_cm + params.gap_overshoot_cm) * 10.0,
                    kind: MoveKind::GapCommit,
                }
            } else {
                NavDecision::Move {
                    turn,
                    forward_mm: params.creep_distance_mm,
                    kind: MoveKind::Creep,
                }
            }
        }
    }
}

/// Decide how to approach the parking zone from a sweep's posts.
pub fn decide_parking(posts: &[PostCandidate], params: &NavParams) -> NavDecision {
    match posts {
        [] => NavDecision::ExitParkingSequence,
        [post] => NavDecision::Move {
            turn: turn_towards(post.angle_deg),
            // Inside the standoff the robot only turns to face the post
            forward_mm: ((post.distance_cm - params.post_standoff_cm) * 10.0).max(0.0),
            kind: MoveKind::PostApproach,
        },
        [first, .., last] => NavDecision::Move {
            turn: turn_towards((first.angle_deg + last.angle_deg) / 2),
            forward_mm: first.distance_cm.min(last.distance_cm) * 10.0,
            kind: MoveKind::PostPassage,
        },
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::gaps::analyze;

    fn obj(angle: i32, distance_cm: f64, width_cm: f64) -> DetectedObject {
        DetectedObject {
            center_angle_deg: angle,
            distance_cm,
            angular_width_deg: 10,
            linear_width_cm: width_cm,
        }
    }

    fn scan(objects: Vec<DetectedObject>) -> ScanResult {
        ScanResult {
            gaps: analyze(&objects),
            objects,
            posts: Vec::new(),
        }
    }

    fn decide(s: &ScanResult) -> NavDecision {
        decide_autonomous(s, &NavParams::default(), SelectPolicy::GlobalMinimum)
    }

    #[test]
    fn test_no_objects() {
        assert_eq!(
            decide(&scan(vec![])),
            NavDecision::Move {
                turn: None,
                forward_mm: 350.0,
                kind: MoveKind::Probe
            }
        );
    }

    #[test]
    fn test_single_object() {
        // Centered, go straight
        assert_eq!(
            decide(&scan(vec![obj(90, 50.0, 17.0)])),
            NavDecision::Move {
                turn: None,
                forward_mm: 350.0,
                kind: MoveKind::Probe
            }
        );

        // Right of centre
        match decide(&scan(vec![obj(40, 50.0, 17.0)])) {
            NavDecision::Move { turn: Some(t), .. } => {
                assert_eq!(t.dir, TurnDir::Right);
                assert_eq!(t.angle_deg, 30.0);
            }
            d => panic!("Unexpected decision {:?}", d),
        }

        // Left of centre
        match decide(&scan(vec![obj(150, 50.0, 17.0)])) {
            NavDecision::Move { turn: Some(t), .. } => assert_eq!(t.dir, TurnDir::Left),
            d => panic!("Unexpected decision {:?}", d),
        }
    }

    #[test]
    fn test_wide_gap() {
        // Gap centred on 110 deg, 40 cm away and ~61 cm wide
        let d = decide(&scan(vec![obj(60, 40.0, 20.0), obj(160, 70.0, 20.0)]));

        assert_eq!(
            d,
            NavDecision::Move {
                turn: Some(TurnCmd {
                    dir: TurnDir::Left,
                    angle_deg: 20.0
                }),
                forward_mm: 500.0,
                kind: MoveKind::GapCommit
            }
        );
    }

    #[test]
    fn test_narrow_gap() {
        // 20 deg apart at 40 cm is ~14 cm wide
        let d = decide(&scan(vec![obj(70, 40.0, 20.0), obj(90, 45.0, 20.0)]));

        assert_eq!(
            d,
            NavDecision::Move {
                turn: Some(TurnCmd {
                    dir: TurnDir::Right,
                    angle_deg: 10.0
                }),
                forward_mm: 100.0,
                kind: MoveKind::Creep
            }
        );
    }

    #[test]
    fn test_posts_enter_parking() {
        let mut s = scan(vec![obj(90, 50.0, 5.0)]);
        s.posts.push(PostCandidate {
            angle_deg: 90,
            distance_cm: 50.0,
        });

        assert_eq!(decide(&s), NavDecision::EnterParkingSequence);
    }

    #[test]
    fn test_parking() {
        let params = NavParams::default();

        assert_eq!(decide_parking(&[], &params), NavDecision::ExitParkingSequence);

        let one = [PostCandidate {
            angle_deg: 70,
            distance_cm: 60.0,
        }];
        assert_eq!(
            decide_parking(&one, &params),
            NavDecision::Move {
                turn: Some(TurnCmd {
                    dir: TurnDir::Right,
                    angle_deg: 20.0
                }),
                forward_mm: 500.0,
                kind: MoveKind::PostApproach
            }
        );

        let three = [
            PostCandidate {
                angle_deg: 60,
                distance_cm: 80.0,
            },
            PostCandidate {
                angle_deg: 90,
                distance_cm: 30.0,
            },
            PostCandidate {
                angle_deg: 140,
                distance_cm: 70.0,
            },
        ];
        assert_eq!(
            decide_parking(&three, &params),
            NavDecision::Move {
                turn: Some(TurnCmd {
                    dir: TurnDir::Left,
                    angle_deg: 10.0
                }),
                forward_mm: 700.0,
                kind: MoveKind::PostPassage
            }
        );
    }

    #[test]
    fn test_single_post_within_standoff() {
        let params = NavParams::default();

        // Already inside the standoff, only face the post
        let close = [PostCandidate {
            angle_deg: 100,
            distance_cm: params.post_standoff_cm - 2.0,
        }];
        assert_eq!(
            decide_parking(&close, &params),
            NavDecision::Move {
                turn: Some(TurnCmd {
                    dir: TurnDir::Left,
                    angle_deg: 10.0
                }),
                forward_mm: 0.0,
                kind: MoveKind::PostApproach
            }
        );

        // Straight ahead as well, nothing to do but re-sweep
        let ahead = [PostCandidate {
            angle_deg: 90,
            distance_cm: params.post_standoff_cm,
        }];
        assert_eq!(
            decide_parking(&ahead, &params),
            NavDecision::Move {
                turn: None,
                forward_mm: 0.0,
                kind: MoveKind::PostApproach
            }
        );
    }
}
