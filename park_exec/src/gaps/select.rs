//! Gap selection

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::{Gap, SelectPolicy};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Select the index of the closest gap.
///
/// One gap is always selected. With two gaps the one with the smaller distance wins, the first
/// winning ties. With more the given policy is used. Returns `None` if there are no gaps.
pub fn select_closest(gaps: &[Gap], policy: SelectPolicy) -> Option<usize> {
    match gaps.len() {
        0 => None,
        1 => Some(0),
        2 => {
            if gaps[1].distance_cm < gaps[0].distance_cm {
                Some(1)
            } else {
                Some(0)
            }
        }
        _ => match policy {
            SelectPolicy::GlobalMinimum => global_minimum(gaps),
            SelectPolicy::AdjacentPairs => adjacent_pairs(gaps),
        },
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn global_minimum(gaps: &[Gap]) -> Option<usize> {
    let mut best: Option<usize> = None;

    for (i, g) in gaps.iter().enumerate() {
        match best {
            Some(b) if gaps[b].distance_cm <= g.distance_cm => (),
            _ => best = Some(i),
        }
    }

    best
}

fn adjacent_pairs(gaps: &[Gap]) -> Option<usize> {
    let mut winner = None;

    for (i, pair) in gaps.windows(2).enumerate() {
        winner = if pair[0].distance_cm < pair[1].distance_cm {
            Some(i)
        } else {
            Some(i + 1)
        };
    }

    winner
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
