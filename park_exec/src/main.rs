//! Main parking executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session, logging and parameters
//!     - Start the operator input thread (console or script)
//!     - Main loop:
//!         - Take a snapshot of the operator's command flags
//!         - Navigator processing (sweep, decide, move)
//!         - Sleep for the remainder of the cycle
//!
//! The main loop exits when the operator stops the run.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{debug, error, info, warn};
use std::{path::PathBuf, sync::Arc, thread, time::Duration};
use structopt::StructOpt;

// Internal
use park_lib::{
    cmd_flags::CmdFlags,
    data_store::DataStore,
    nav::{NavState, Navigator},
    operator,
    params::ParkExecParams,
    sim::{SimWorld, SimWorldParams},
};
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    script_interpreter::ScriptInterpreter,
    session::{self, Session},
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of consecutive navigation errors after which the executable gives up.
const MAX_CONSEC_NAV_ERRORS: u64 = 5;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(StructOpt, Debug)]
#[structopt(name = "park_exec", about = "Autonomous gap navigation and parking")]
struct Args {
    /// Operator command script to run instead of the console.
    #[structopt(short = "s", long = "script", parse(from_os_str))]
    script: Option<PathBuf>,

    /// Simulated world parameter file, relative to the params directory.
    #[structopt(short = "w", long = "world", default_value = "sim_world.toml")]
    world: String,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let args = Args::from_args();

    // ---- EARLY INITIALISATION ----

    let session = Session::new("park_exec", "sessions").wrap_err("Failed to create the session")?;

    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    info!("Parking Executable\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI arguments: {:?}", args);

    // ---- LOAD PARAMETERS ----

    let params: ParkExecParams =
        util::params::load("park_exec.toml").wrap_err("Could not load exec params")?;
    let world_params: SimWorldParams =
        util::params::load(&args.world).wrap_err("Could not load the simulated world")?;

    info!("Exec parameters loaded");

    let cycle_period_s = params.nav.cycle_period_s;

    // ---- OPERATOR INPUT ----

    let flags = Arc::new(CmdFlags::new());

    let operator_jh = match args.script {
        Some(ref path) => {
            info!("Loading script from {:?}", path);

            let si = ScriptInterpreter::new(path).wrap_err("Failed to load script")?;

            info!(
                "Loaded script lasts {:.02} s and contains {} commands\n",
                si.get_duration(),
                si.get_num_cmds()
            );

            operator::spawn_script(flags.clone(), si)
        }
        None => operator::spawn_console(flags.clone()),
    };

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    let (head, drive) = SimWorld::new(world_params).split();
    let mut nav = Navigator::new(params, flags.clone(), head, drive);

    nav.init((), &session)
        .wrap_err("Failed to initialise the Navigator")?;

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {
        ds.cycle_start();

        ds.mode = flags.take();

        match nav.proc(&ds.mode) {
            Ok((o, r)) => {
                ds.nav_output = Some(o);
                ds.nav_status_rpt = Some(r);
                ds.num_consec_nav_errors = 0;
            }
            Err(e) => {
                warn!("Error during navigation processing: {}", e);
                ds.num_consec_nav_errors += 1;

                // Make sure we're not left driving blind
                if let Err(e) = nav.motion_mut().stop() {
                    error!("Could not stop the drive: {}", e);
                }
            }
        }

        if ds.is_terminated() {
            info!("Run stopped after {} cycles", ds.num_cycles + 1);
            break;
        }

        // A stop before the run started leaves the navigator idle, so exit once nothing else can
        // ever start it
        if nav.state() == NavState::Idle && operator_jh.is_finished() {
            info!("Operator input closed before the run was started");
            break;
        }

        if ds.num_consec_nav_errors >= MAX_CONSEC_NAV_ERRORS {
            error!(
                "{} consecutive navigation errors, exiting",
                ds.num_consec_nav_errors
            );
            break;
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur_s = session::get_elapsed_seconds() - ds.cycle_start_s;

        if cycle_dur_s < cycle_period_s {
            ds.num_consec_cycle_overruns = 0;
            thread::sleep(Duration::from_secs_f64(cycle_period_s - cycle_dur_s));
        } else {
            ds.num_consec_cycle_overruns += 1;

            // Sweeps and moves take seconds, so overruns are only worth noting outside of idle
            debug!(
                "Cycle overran by {:.06} s ({} consecutive)",
                cycle_dur_s - cycle_period_s,
                ds.num_consec_cycle_overruns
            );
        }

        ds.cycle_end();
    }

    // ---- SHUTDOWN ----

    if let Ok(world) = nav.head().world().lock() {
        let pose = world.pose();
        info!(
            "Final pose: ({:.1}, {:.1}) cm, heading {:.1} deg",
            pose.position_cm.x,
            pose.position_cm.y,
            pose.heading_rad.to_degrees()
        );
    }

    if let Some(rpt) = ds.nav_status_rpt {
        session.save("final_status.json", rpt);
    }

    info!("End of execution");

    session.exit();

    Ok(())
}
