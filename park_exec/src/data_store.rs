//! # Data Store

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crate::{
    cmd_flags::ModeSnapshot,
    nav::{CycleOutput, StatusReport},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Debug, Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u64,

    /// Elapsed session time at the start of the cycle
    pub cycle_start_s: f64,

    // Operator
    pub mode: ModeSnapshot,

    // Navigator
    pub nav_output: Option<CycleOutput>,
    pub nav_status_rpt: Option<StatusReport>,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,

    /// Number of consecutive cycles which ended in an error
    pub num_consec_nav_errors: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    pub fn cycle_start(&mut self) {
        self.nav_output = None;
        self.nav_status_rpt = None;

        self.cycle_start_s = util::session::get_elapsed_seconds();
    }

    /// Perform actions required at the end of a cycle.
    pub fn cycle_end(&mut self) {
        self.num_cycles += 1;
    }

    /// True if the navigator reported that the run is over.
    pub fn is_terminated(&self) -> bool {
        self.nav_output.as_ref().map_or(false, |o| o.terminated)
    }
}
