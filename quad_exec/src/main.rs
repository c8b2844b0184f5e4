//! Main quadruped executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Telecommand processing and handling
//!         - Locomotion control processing
//!         - Servo demand calculation
//!         - Archiving
//!
//! Telecommands are read from a script given as the only argument.
//!
//! # Modules
//!
//! All modules (e.g. `loco_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.
//!

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use quad_lib::{
    data_store::{DataStore, SafeModeCause},
    loco_ctrl::{self, LocoCtrl},
    params::ExecParams,
    servo_cal::{self, ServoCal},
};

mod tc_processor;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use chrono::Utc;
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use comms_if::eqpt::joints::JointDems;
use log::{debug, info, trace, warn};
use std::env;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use util::{
    archive::Archived,
    host,
    logger::{logger_init, parse_level},
    module::State,
    script_interpreter::{PendingTcs, ScriptInterpreter},
    session::Session,
};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("quad_exec", "sessions").wrap_err("Failed to create the session")?;

    // Exec params are needed before the logger can be started
    let exec_params: ExecParams =
        util::params::load("quad_exec.toml").wrap_err("Could not load exec params")?;

    // Initialise logger
    let log_level = parse_level(&exec_params.log_level).wrap_err("Invalid log level")?;
    logger_init(log_level, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Quadruped Executable\n");
    info!("Running on: {}", host::get_host_desc());
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let loco_ctrl_params: loco_ctrl::Params = util::params::load(&exec_params.loco_ctrl_params)
        .wrap_err("Could not load LocoCtrl params")?;
    let servo_cal_params: servo_cal::Params = util::params::load(&exec_params.servo_cal_params)
        .wrap_err("Could not load servo calibration params")?;

    info!("Exec parameters loaded");

    let cycle_period = Duration::from_secs_f64(exec_params.cycle_period_s);
    let cycle_frequency_hz = 1.0 / exec_params.cycle_period_s;

    // ---- INITIALISE TC SOURCE ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    if args.len() != 2 {
        return Err(eyre!(
            "Expected a single script path argument, found {} arguments",
            args.len() - 1
        ));
    }

    info!("Loading script from \"{}\"", &args[1]);

    let mut script =
        ScriptInterpreter::new(&args[1]).wrap_err("Failed to load script")?;

    info!(
        "Loaded script lasts {:.02} s and contains {} TCs\n",
        script.get_duration(),
        script.get_num_tcs()
    );

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut loco_ctrl =
        LocoCtrl::new(loco_ctrl_params, Utc::now()).wrap_err("Failed to initialise LocoCtrl")?;
    if exec_params.archive {
        loco_ctrl
            .init_archives(&session)
            .wrap_err("Failed to initialise LocoCtrl archives")?;
    }
    info!("LocoCtrl init complete");

    let servo_cal = ServoCal::new(servo_cal_params);
    info!("ServoCal init complete");

    let mut ds = DataStore::new(loco_ctrl, servo_cal);

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start(cycle_frequency_hz);

        // ---- TELECOMMAND PROCESSING ----

        match script.get_pending_tcs() {
            PendingTcs::None => (),
            PendingTcs::Some(tc_vec) => {
                for tc in tc_vec.iter() {
                    tc_processor::exec(&mut ds, tc);
                }
            }
            // Exit if end of script reached
            PendingTcs::EndOfScript => {
                info!("End of TC script reached, stopping");
                break;
            }
        }

        // ---- CONTROL ALGORITHM PROCESSING ----

        // LocoCtrl processing
        match ds.loco_ctrl.proc(&ds.loco_ctrl_input) {
            Ok((o, r)) => {
                ds.loco_ctrl_output = Some(o);
                ds.loco_ctrl_status_rpt = r;
                ds.joint_dems = JointDems::from(o.joint_pos_rad);
            }
            Err(e) => warn!("Error during LocoCtrl processing: {}", e),
        };

        // Servo demands
        match ds.servo_cal.servo_dems(&ds.joint_dems.pos_rad) {
            Ok(dems) => {
                ds.make_unsafe(SafeModeCause::ServoCalError).ok();
                trace!("Servo demands: {:?}", dems);
                ds.servo_dems = Some(dems);
            }
            Err(e) => {
                if !ds.safe {
                    warn!("Cannot calculate servo demands: {}", e);
                }
                ds.make_safe(SafeModeCause::ServoCalError);
            }
        }

        if ds.is_1_hz_cycle {
            if let Some(o) = ds.loco_ctrl_output {
                info!(
                    "Estimated velocity: [{:.3}, {:.3}] m/s, {:.3} rad/s",
                    o.est_vel.linear.x, o.est_vel.linear.y, o.est_vel.angular.z
                );
            }
        }

        // ---- WRITE ARCHIVES ----

        if let Err(e) = ds.loco_ctrl.write() {
            warn!("Could not write LocoCtrl archives: {}", e);
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            }
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - cycle_period.as_secs_f64()
                );
                ds.num_consec_cycle_overruns += 1;
            }
        }

        ds.cycle_end();
    }

    // ---- SHUTDOWN ----

    info!(
        "End of execution after {} cycles, {} TCs dropped",
        ds.num_cycles, ds.num_dropped_tcs
    );

    Ok(())
}
