//! # Operator command module
//!
//! Operator commands are single tokens typed at the console (or replayed from a script). Each
//! token maps onto one `OperatorCmd`, which the executable latches into its shared command flags.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A command from the operator.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub enum OperatorCmd {
    /// Start (or resume) the run
    Go,

    /// Stop all motion and end the run
    Stop,

    /// Toggle between manual and autonomous operation
    Manual,

    /// A single manual manouvre, only executed in manual mode
    Mnvr(ManualMnvr),
}

/// Manual manouvres.
///
/// Each manouvre has a non-zero code so that it can be stored in a single atomic byte, with zero
/// meaning "no pending manouvre".
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub enum ManualMnvr {
    /// Step forwards
    Forward = 1,

    /// Reverse direction, step forwards, then turn back
    Backward = 2,

    /// Small turn to the left
    Left = 3,

    /// Small turn to the right
    Right = 4,

    /// Sweep and report without moving
    Rescan = 5,

    /// Quarter turn to the left
    Left90 = 6,

    /// Quarter turn to the right
    Right90 = 7,

    /// Half turn
    TurnAround = 8,
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum TcParseError {
    #[error("Empty command")]
    Empty,

    #[error("Unrecognised command token \"{0}\"")]
    UnknownToken(String),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl OperatorCmd {
    /// Parse a command from an operator token. Tokens are case-insensitive and surrounding
    /// whitespace is ignored.
    pub fn from_token(token: &str) -> Result<Self, TcParseError> {
        let token = token.trim().to_lowercase();

        if token.is_empty() {
            return Err(TcParseError::Empty);
        }

        let cmd = match token.as_str() {
            "g" | "go" | "start" => OperatorCmd::Go,
            "s" | "stop" => OperatorCmd::Stop,
            "m" | "manual" => OperatorCmd::Manual,
            "w" => OperatorCmd::Mnvr(ManualMnvr::Forward),
            "x" => OperatorCmd::Mnvr(ManualMnvr::Backward),
            "a" => OperatorCmd::Mnvr(ManualMnvr::Left),
            "d" => OperatorCmd::Mnvr(ManualMnvr::Right),
            "q" => OperatorCmd::Mnvr(ManualMnvr::Left90),
            "e" => OperatorCmd::Mnvr(ManualMnvr::Right90),
            "t" => OperatorCmd::Mnvr(ManualMnvr::TurnAround),
            "r" => OperatorCmd::Mnvr(ManualMnvr::Rescan),
            _ => return Err(TcParseError::UnknownToken(token)),
        };

        Ok(cmd)
    }
}

impl ManualMnvr {
    /// The code of this manouvre, never zero.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Get the manouvre for a code, `None` for zero or unknown codes.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(ManualMnvr::Forward),
            2 => Some(ManualMnvr::Backward),
            3 => Some(ManualMnvr::Left),
            4 => Some(ManualMnvr::Right),
            5 => Some(ManualMnvr::Rescan),
            6 => Some(ManualMnvr::Left90),
            7 => Some(ManualMnvr::Right90),
            8 => Some(ManualMnvr::TurnAround),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
