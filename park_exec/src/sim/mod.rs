//! # Simulated equipment
//!
//! - [`SimWorld`] is a simple 2D field with obstacles, posts and boundary tape, used to run the
//!   executable without the robot.
//! - [`ScriptedHead`] and [`ScriptedDrive`] replay prepared data, used by the tests.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod scripted;
mod world;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use scripted::*;
pub use world::*;
