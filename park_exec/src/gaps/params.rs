//! Parameters structure for gap selection

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for gap selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GapParams {
    pub select_policy: SelectPolicy,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// How the closest gap is chosen when there are more than two gaps.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum SelectPolicy {
    /// The gap with the smallest distance over all gaps. The first one wins ties.
    GlobalMinimum,

    /// Compare each adjacent pair left to right, keeping the winner of the last pair.
    AdjacentPairs,
}

impl Default for SelectPolicy {
    fn default() -> Self {
        SelectPolicy::GlobalMinimum
    }
}
