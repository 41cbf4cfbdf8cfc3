//! Cyclic module interface
//!
//! The executable is built from modules which are initialised once against the session and then
//! processed once per cycle of the main loop. The navigator is one, taking the operator's mode
//! snapshot as its input and producing the cycle's decision and a status report.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crate::session::Session;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A module's internal state, carried between cycles.
pub trait State {
    /// Data required during initialisation
    type InitData;
    /// An error which can occur during initialisation.
    type InitError;

    /// Data consumed by one cycle.
    type InputData;
    /// Data produced by one cycle.
    type OutputData;
    /// Summary of one cycle, suitable for archiving.
    type StatusReport;
    /// An error which aborts a cycle.
    type ProcError;

    /// Initialise the module against the session, opening any archives it writes.
    ///
    /// Modules which are never initialised (for example in tests) must still be able to run
    /// `proc`, they just don't archive anything.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>;

    /// Run one cycle.
    ///
    /// An error aborts this cycle only. The caller decides whether to carry on with the next.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>;
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
