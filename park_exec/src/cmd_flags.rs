//! # Command flags
//!
//! The operator thread latches commands into a set of single-word atomics, and the main loop
//! takes a snapshot of them at the top of each cycle. These flags are the only state shared
//! between the two threads.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::tc::{ManualMnvr, OperatorCmd};
use log::info;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Flags shared between one producer (the operator input) and one consumer (the main loop).
#[derive(Debug, Default)]
pub struct CmdFlags {
    running: AtomicBool,
    manual: AtomicBool,

    /// Code of the pending manual manouvre, zero if there isn't one.
    mnvr_code: AtomicU8,
}

/// The flags as read by the main loop at the start of a cycle.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModeSnapshot {
    pub running: bool,
    pub manual: bool,
    pub mnvr: Option<ManualMnvr>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CmdFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch an operator command into the flags.
    pub fn latch(&self, cmd: OperatorCmd) {
        match cmd {
            OperatorCmd::Go => {
                if !self.running.swap(true, Ordering::AcqRel) {
                    info!("Go received, starting");
                }
            }
            OperatorCmd::Stop => {
                self.running.store(false, Ordering::Release);
                info!("Stop received");
            }
            OperatorCmd::Manual => {
                let was_manual = self.manual.fetch_xor(true, Ordering::AcqRel);
                if was_manual {
                    info!("Entering autonomous mode");
                } else {
                    info!("Entering manual mode");
                }
            }
            OperatorCmd::Mnvr(m) => self.mnvr_code.store(m.code(), Ordering::Release),
        }
    }

    /// Read the flags, consuming any pending manouvre so that it's only executed once.
    pub fn take(&self) -> ModeSnapshot {
        ModeSnapshot {
            running: self.running.load(Ordering::Acquire),
            manual: self.manual.load(Ordering::Acquire),
            mnvr: ManualMnvr::from_code(self.mnvr_code.swap(0, Ordering::AcqRel)),
        }
    }

    /// Read the running flag without consuming anything.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_latch_and_take() {
        let flags = CmdFlags::new();

        assert_eq!(flags.take(), ModeSnapshot::default());

        flags.latch(OperatorCmd::Go);
        flags.latch(OperatorCmd::Manual);
        flags.latch(OperatorCmd::Mnvr(ManualMnvr::Left90));

        assert_eq!(
            flags.take(),
            ModeSnapshot {
                running: true,
                manual: true,
                mnvr: Some(ManualMnvr::Left90)
            }
        );

        // The manouvre is only taken once
        assert_eq!(flags.take().mnvr, None);

        // Manual toggles
        flags.latch(OperatorCmd::Manual);
        assert!(!flags.take().manual);

        flags.latch(OperatorCmd::Stop);
        assert!(!flags.is_running());
    }

    #[test]
    fn test_latest_mnvr_wins() {
        let flags = CmdFlags::new();

        flags.latch(OperatorCmd::Mnvr(ManualMnvr::Forward));
        flags.latch(OperatorCmd::Mnvr(ManualMnvr::Rescan));

        assert_eq!(flags.take().mnvr, Some(ManualMnvr::Rescan));
    }

    #[test]
    fn test_cross_thread() {
        let flags = Arc::new(CmdFlags::new());

        let producer = {
            let flags = flags.clone();
            thread::spawn(move || {
                flags.latch(OperatorCmd::Go);
                flags.latch(OperatorCmd::Stop);
            })
        };

        producer.join().unwrap();

        assert!(!flags.take().running);
    }
}
