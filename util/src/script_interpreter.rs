//! # Operator script interpreter module
//!
//! This module provides an interpreter for operator scripts, allowing operator commands to be
//! replayed at fixed times. A script is a sequence of `<secs>: <token>;` entries, for example:
//!
//! ```text
//! 0.0: g;
//! 12.5: m;
//! 13.0: w;
//! 20.0: s;
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use regex::RegexBuilder;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use thiserror::Error;

// Internal
use crate::session::get_elapsed_seconds;
use comms_if::tc::{OperatorCmd, TcParseError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A command which is scripted to occur at a specific time.
#[derive(Debug, Clone)]
struct Command {
    /// The time the command is supposed to execute at
    exec_time_s: f64,

    cmd: OperatorCmd,
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use `.get_pending_cmds` to
/// acquire a list of operator commands that need executing.
pub struct ScriptInterpreter {
    cmds: VecDeque<Command>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0}")]
    ScriptNotFound(String),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)"
    )]
    InvalidTimestamp(String),

    #[error("Script contains an invalid command at {0} s: {1}")]
    InvalidCmd(f64, TcParseError),
}

#[derive(Debug, PartialEq)]
pub enum PendingCmds {
    None,
    Some(Vec<OperatorCmd>),
    EndOfScript,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptInterpreter {
    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {
        let path = script_path.as_ref();

        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(path.display().to_string()));
        }

        let script = fs::read_to_string(path).map_err(ScriptError::ScriptLoadError)?;

        Self::from_script_str(&script)
    }

    /// Create a new interpreter from the script's contents.
    pub fn from_script_str(script: &str) -> Result<Self, ScriptError> {
        let mut cmd_queue: VecDeque<Command> = VecDeque::new();

        let re = match RegexBuilder::new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
        {
            Ok(r) => r,
            Err(_) => return Err(ScriptError::ScriptEmpty),
        };

        for cap in re.captures_iter(script) {
            let time_str = cap.get(1).map_or("", |m| m.as_str());
            let exec_time_s: f64 = time_str
                .parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            let token = cap.get(3).map_or("", |m| m.as_str());
            let cmd = OperatorCmd::from_token(token)
                .map_err(|e| ScriptError::InvalidCmd(exec_time_s, e))?;

            cmd_queue.push_back(Command { exec_time_s, cmd });
        }

        if cmd_queue.is_empty() {
            return Err(ScriptError::ScriptEmpty);
        }

        Ok(ScriptInterpreter { cmds: cmd_queue })
    }

    /// Return the commands due at the current session time.
    pub fn get_pending_cmds(&mut self) -> PendingCmds {
        self.get_pending_cmds_at(get_elapsed_seconds())
    }

    /// Return the commands whose execution time is at or before `current_time_s`.
    pub fn get_pending_cmds_at(&mut self, current_time_s: f64) -> PendingCmds {
        // If the queue is empty the script is over
        if self.cmds.is_empty() {
            return PendingCmds::EndOfScript;
        }

        let mut cmd_vec: Vec<OperatorCmd> = vec![];

        while let Some(c) = self.cmds.front() {
            if c.exec_time_s > current_time_s {
                break;
            }
            if let Some(c) = self.cmds.pop_front() {
                cmd_vec.push(c.cmd);
            }
        }

        if !cmd_vec.is_empty() {
            PendingCmds::Some(cmd_vec)
        } else {
            PendingCmds::None
        }
    }

    /// Get the number of commands remaining in the script
    pub fn get_num_cmds(&self) -> usize {
        self.cmds.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.cmds.back() {
            Some(c) => c.exec_time_s,
            None => 0f64,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
