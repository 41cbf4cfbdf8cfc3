//! # Communications interface crate.
//!
//! Provides the interfaces between the parking software and the outside world: the operator
//! command channel and the scan-head and drive equipment.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Operator commands
pub mod tc;

/// Interfaces and data definitions for equipment (scan head, drive)
pub mod eqpt;
