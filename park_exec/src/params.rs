//! # Parking Executable Parameters
//!
//! This module provide parameters for the parking executable, one section per module.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::{
    gaps::GapParams,
    motion::MotionParams,
    nav::NavParams,
    objects::{DetectParams, PostParams},
    scan::SweepParams,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for the whole executable, loaded from `park_exec.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParkExecParams {
    pub sweep: SweepParams,

    pub detect: DetectParams,

    pub posts: PostParams,

    pub gaps: GapParams,

    pub motion: MotionParams,

    pub nav: NavParams,
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
