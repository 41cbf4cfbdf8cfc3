//! # Navigation module
//!
//! The [`Navigator`] runs one decision cycle per call to `proc`:
//!
//! - `Autonomous` - sweep, detect objects and posts, then either probe forwards, steer through the
//!   closest gap, or hand over to the parking approach if posts are in view.
//! - `Parking` - sweep, then approach a single post or pass between the outermost pair.
//! - `Manual` - execute the operator's pending manouvre.
//!
//! Bump and cliff events during any forward move are followed by a recovery turn. The robot then
//! re-sweeps on the next cycle rather than moving again.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod decide;
mod navigator;
mod params;
mod state;
pub mod tm;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use util::archive::ArchiveError;

use crate::{motion::MotionError, scan::SweepError};

pub use decide::*;
pub use navigator::*;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during a navigation cycle.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("Sweep failed: {0}")]
    SweepError(#[from] SweepError),

    #[error("Motion failed: {0}")]
    MotionError(#[from] MotionError),

    #[error("Could not open the navigation archives: {0}")]
    ArchiveError(#[from] ArchiveError),
}
