//! # Operator input
//!
//! Operator commands arrive either from the console, one token per line, or from a timed script.
//! Each source runs on its own thread and only ever touches the [`CmdFlags`].

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::tc::OperatorCmd;
use log::{debug, info, warn};
use rustyline::{error::ReadlineError, DefaultEditor};
use std::{
    sync::Arc,
    thread::{self, JoinHandle},
    time::Duration,
};
use util::script_interpreter::{PendingCmds, ScriptInterpreter};

use crate::cmd_flags::CmdFlags;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

const PROMPT: &str = "park $ ";

/// Period at which the script thread checks for due commands.
const SCRIPT_POLL_PERIOD: Duration = Duration::from_millis(10);

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Latch a single line of operator input. Returns the parsed command, or `None` if the line was
/// not understood.
pub fn handle_line(flags: &CmdFlags, line: &str) -> Option<OperatorCmd> {
    match OperatorCmd::from_token(line) {
        Ok(cmd) => {
            debug!("Operator command: {:?}", cmd);
            flags.latch(cmd);
            Some(cmd)
        }
        Err(e) => {
            warn!("{}", e);
            None
        }
    }
}

/// Start the console input thread.
///
/// Closing the console (Ctrl-C or Ctrl-D) latches a stop so the main loop exits.
pub fn spawn_console(flags: Arc<CmdFlags>) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                warn!("Could not open the console, stopping: {}", e);
                flags.latch(OperatorCmd::Stop);
                return;
            }
        };

        info!("Console ready, enter g to start, s to stop, m to toggle manual mode");

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if let Err(e) = rl.add_history_entry(line.as_str()) {
                        debug!("Could not add console history entry: {}", e);
                    }
                    handle_line(&flags, &line);
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    info!("Console closed");
                    flags.latch(OperatorCmd::Stop);
                    break;
                }
                Err(e) => {
                    warn!("Console error, stopping: {}", e);
                    flags.latch(OperatorCmd::Stop);
                    break;
                }
            }
        }
    })
}

/// Start the script input thread, latching each command when it falls due.
pub fn spawn_script(flags: Arc<CmdFlags>, mut si: ScriptInterpreter) -> JoinHandle<()> {
    thread::spawn(move || loop {
        match si.get_pending_cmds() {
            PendingCmds::None => (),
            PendingCmds::Some(cmds) => {
                for cmd in cmds {
                    debug!("Script command: {:?}", cmd);
                    flags.latch(cmd);
                }
            }
            PendingCmds::EndOfScript => {
                info!("End of script reached, stopping");
                flags.latch(OperatorCmd::Stop);
                break;
            }
        }

        thread::sleep(SCRIPT_POLL_PERIOD);
    })
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::tc::ManualMnvr;

    #[test]
    fn test_handle_line() {
        let flags = CmdFlags::new();

        assert_eq!(handle_line(&flags, " G "), Some(OperatorCmd::Go));
        assert!(flags.is_running());

        assert_eq!(handle_line(&flags, "jump"), None);
        assert!(flags.is_running());

        assert_eq!(handle_line(&flags, "m"), Some(OperatorCmd::Manual));
        assert_eq!(
            handle_line(&flags, "q"),
            Some(OperatorCmd::Mnvr(ManualMnvr::Left90))
        );

        let snap = flags.take();
        assert!(snap.manual);
        assert_eq!(snap.mnvr, Some(ManualMnvr::Left90));

        handle_line(&flags, "stop");
        assert!(!flags.is_running());
    }

    #[test]
    fn test_script_ends_with_stop() {
        let flags = Arc::new(CmdFlags::new());
        let si = ScriptInterpreter::from_script_str("0.0: g;\n0.0: w;").unwrap();

        spawn_script(flags.clone(), si).join().unwrap();

        let snap = flags.take();
        assert!(!snap.running);
        assert_eq!(snap.mnvr, Some(ManualMnvr::Forward));
    }
}
