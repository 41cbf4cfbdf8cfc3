//! # Parking library.
//!
//! This library allows other crates in the workspace (and the integration tests and benchmarks)
//! to access items defined inside the parking executable.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Command flags shared between the operator input thread and the main loop
pub mod cmd_flags;

/// Global data store for the executable
pub mod data_store;

/// Gap analysis and selection - finds the navigable space between detected objects
pub mod gaps;

/// Motion control - forward, backward and turn primitives with bump/cliff recovery
pub mod motion;

/// Navigator - the top level scan, decide, move cycle
pub mod nav;

/// Object detection and post classification
pub mod objects;

/// Operator input - console and scripted command sources
pub mod operator;

/// Executable parameters
pub mod params;

/// Sensor sweeps using the scan head
pub mod scan;

/// Simulated and scripted equipment
pub mod sim;
