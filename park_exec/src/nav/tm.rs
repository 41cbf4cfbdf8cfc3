//! # Navigation telemetry
//!
//! A [`SweepTm`] packet is produced after every sweep and handed to a [`TmSink`]. Telemetry is
//! advisory, a sink failing never changes what the robot does.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use util::{
    archive::{ArchiveError, Archiver},
    session::{self, Session},
};

use super::{NavDecision, NavState, ScanResult};

// -----------------------------------------------------------------------------------------------
// STRUCTS
// -----------------------------------------------------------------------------------------------

/// Telemetry summarising one sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepTm {
    pub cycle: u64,
    pub timestamp: DateTime<Utc>,
    pub state: NavState,
    pub scan: ScanResult,
    pub post_zone: bool,
    pub decision: Option<NavDecision>,
}

/// Sink writing telemetry into the session directory.
///
/// Each packet is saved as `tm/sweep_<cycle>.json`, and the objects and gaps are appended to the
/// `objects.csv` and `gaps.csv` archives.
pub struct SessionTm {
    arch_objects: Archiver,
    arch_gaps: Archiver,
}

/// Sink which drops everything.
#[derive(Debug, Default)]
pub struct NullTm;

/// Sink which keeps every packet in memory.
#[derive(Debug, Clone, Default)]
pub struct VecTm {
    sent: Arc<Mutex<Vec<SweepTm>>>,
}

/// Row of the objects archive.
#[derive(Serialize)]
struct ObjectRow {
    angle_deg: i32,
    distance_cm: f64,
    width_cm: f64,
}

/// Row of the gaps archive.
#[derive(Serialize)]
struct GapRow {
    cycle: u64,
    angle_deg: i32,
    distance_cm: f64,
    width_cm: f64,
}

// -----------------------------------------------------------------------------------------------
// ENUMS
// -----------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum TmError {
    #[error("Could not archive telemetry: {0}")]
    ArchiveError(#[from] ArchiveError),

    #[error("Telemetry store is unavailable")]
    Unavailable,
}

// -----------------------------------------------------------------------------------------------
// TRAITS
// -----------------------------------------------------------------------------------------------

/// Destination for telemetry.
pub trait TmSink {
    fn send(&mut self, tm: &SweepTm) -> Result<(), TmError>;
}

// -----------------------------------------------------------------------------------------------
// IMPLS
// -----------------------------------------------------------------------------------------------

impl SessionTm {
    pub fn new(session: &Session) -> Result<Self, ArchiveError> {
        Ok(Self {
            arch_objects: Archiver::from_path(session, "objects.csv")?,
            arch_gaps: Archiver::from_path(session, "gaps.csv")?,
        })
    }
}

impl TmSink for SessionTm {
    fn send(&mut self, tm: &SweepTm) -> Result<(), TmError> {
        session::save(format!("tm/sweep_{}.json", tm.cycle), tm.clone());

        for o in tm.scan.objects.iter() {
            self.arch_objects.serialise(ObjectRow {
                angle_deg: o.center_angle_deg,
                distance_cm: o.distance_cm,
                width_cm: o.linear_width_cm,
            })?;
        }

        for g in tm.scan.gaps.iter() {
            self.arch_gaps.serialise(GapRow {
                cycle: tm.cycle,
                angle_deg: g.center_angle_deg,
                distance_cm: g.distance_cm,
                width_cm: g.linear_width_cm,
            })?;
        }

        Ok(())
    }
}

impl TmSink for NullTm {
    fn send(&mut self, _tm: &SweepTm) -> Result<(), TmError> {
        Ok(())
    }
}

impl VecTm {
    pub fn new() -> Self {
        Self::default()
    }

    /// All packets sent so far, shared between clones of this sink.
    pub fn sent(&self) -> Vec<SweepTm> {
        match self.sent.lock() {
            Ok(v) => v.clone(),
            Err(_) => Vec::new(),
        }
    }
}

impl TmSink for VecTm {
    fn send(&mut self, tm: &SweepTm) -> Result<(), TmError> {
        self.sent
            .lock()
            .map_err(|_| TmError::Unavailable)?
            .push(tm.clone());
        Ok(())
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
