//! # Equipment Interface
//!
//! This module defines the interfaces to the robot's equipment: the rotating scan head and the
//! differential drive. Implementations are blocking, callers poll them from a single thread.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod drive;
pub mod scan_head;

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use thiserror::Error;

// -----------------------------------------------------------------------------------------------
// EXPORTS
// -----------------------------------------------------------------------------------------------

pub use drive::{Drive, OdomSample};
pub use scan_head::{HeadReading, IrCalibration, ScanHead};

// -----------------------------------------------------------------------------------------------
// ENUMS
// -----------------------------------------------------------------------------------------------

/// Errors raised by equipment.
#[derive(Debug, Error)]
pub enum EqptError {
    #[error("Scan head cannot point to {0} deg, must be in [0, 180]")]
    InvalidAngle(i32),

    #[error("Could not read from the equipment: {0}")]
    ReadFailed(String),

    #[error("Could not write to the equipment: {0}")]
    WriteFailed(String),

    #[error("The equipment is not connected")]
    Disconnected,
}
