//! Recovery turns after bump and cliff events

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::{MoveStatus, TurnCmd, TurnDir};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// The corrective turn for a forward move's status, or `None` if the move completed.
///
/// Events on the left turn the robot away to the right, events on the right turn it to the left.
pub fn recovery_turn(status: MoveStatus, angle_deg: f64) -> Option<TurnCmd> {
    let dir = match status {
        MoveStatus::Complete => return None,
        MoveStatus::BumpedLeft | MoveStatus::CliffLeft => TurnDir::Right,
        MoveStatus::BumpedRight | MoveStatus::CliffRight => TurnDir::Left,
    };

    Some(TurnCmd { dir, angle_deg })
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_recovery_turn() {
        assert_eq!(recovery_turn(MoveStatus::Complete, 90.0), None);

        for &s in [MoveStatus::BumpedLeft, MoveStatus::CliffLeft].iter() {
            assert_eq!(
                recovery_turn(s, 90.0),
                Some(TurnCmd {
                    dir: TurnDir::Right,
                    angle_deg: 90.0
                })
            );
        }

        for &s in [MoveStatus::BumpedRight, MoveStatus::CliffRight].iter() {
            assert_eq!(recovery_turn(s, 90.0).map(|t| t.dir), Some(TurnDir::Left));
        }
    }
}
