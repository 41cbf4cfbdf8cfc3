//! Parameters structure for the sensor sweep

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the sensor sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepParams {
    /// Time allowed for the head to slew back to the start angle before sampling.
    ///
    /// Units: milliseconds
    pub initial_settle_ms: u64,

    /// If true every sample is written to the trace log.
    pub log_samples: bool,
}

impl Default for SweepParams {
    fn default() -> Self {
        Self {
            initial_settle_ms: 1500,
            log_samples: false,
        }
    }
}
