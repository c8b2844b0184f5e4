//! Implementations for the LocoCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use chrono::{DateTime, Utc};
use log::{debug, trace, warn};
use serde::Serialize;

// Internal
use super::{LocoCtrlError, Params};
use crate::body_ctrl::BodyCtrl;
use crate::kinematics;
use crate::leg_ctrl::LegCtrl;
use crate::odometry::Odometry;
use crate::quad_base::{GaitConfig, Pose, QuadBase, Velocities, NUM_JOINTS, NUM_LEGS};
use util::{
    archive::{ArchiveError, Archived, Archiver},
    module::State,
    session::Session,
    time::duration_to_seconds,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Locomotion control module state
pub struct LocoCtrl {
    pub(crate) params: Params,

    base: QuadBase,
    body_ctrl: BodyCtrl,
    leg_ctrl: LegCtrl,
    odometry: Odometry,

    start_time: DateTime<Utc>,
    last_time: DateTime<Utc>,

    /// Held velocity command.
    vel_cmd: Velocities,

    /// Held pose command, as an offset from the nominal standing pose.
    pose_cmd: Pose,

    pub(crate) report: StatusReport,
    arch_report: Archiver,

    pub(crate) output: Option<OutputData>,
    arch_output: Archiver,
}

/// Input data to Locomotion Control.
#[derive(Debug, Clone)]
pub struct InputData {
    /// New velocity command, or `None` to keep the held one.
    pub vel_cmd: Option<Velocities>,

    /// New pose command, or `None` to keep the held one.
    ///
    /// The pose is an offset from the nominal standing pose, so a zero pose stands the body at
    /// the gait's `nominal_height`.
    pub pose_cmd: Option<Pose>,

    /// Sensed contact of each foot. When `None` legs in stance are assumed to be in contact.
    pub contacts: Option<[bool; NUM_LEGS]>,

    /// Time of this tick.
    pub time: DateTime<Utc>,
}

/// Output data from LocoCtrl, the joint demands to be sent to the servos.
#[derive(Clone, Copy, Serialize, Debug)]
pub struct OutputData {
    /// Joint angle demands, hip, upper, lower for each leg.
    ///
    /// Units: radians
    pub joint_pos_rad: [f64; NUM_JOINTS],

    /// Estimated body velocity.
    pub est_vel: Velocities,

    /// Position of each foot relative to its hip.
    ///
    /// Units: meters
    pub foot_pos_hip: [[f64; 3]; NUM_LEGS],
}

/// Status report for LocoCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq)]
pub struct StatusReport {
    /// The IK frame was rejected and the joints held at their previous position.
    pub ik_rejected: bool,

    /// The velocity command was clamped to the gait's limits.
    pub vel_limited: bool,

    /// Gait phase of each leg, true for stance.
    pub gait_phase: [bool; NUM_LEGS],

    /// Contact flag of each leg used for odometry.
    pub contacts: [bool; NUM_LEGS],
}

/// Flat status record written to the archive each cycle.
#[derive(Serialize)]
struct StatusRecord {
    time_s: f64,
    ik_rejected: bool,
    vel_limited: bool,
    stance_lf: bool,
    stance_rf: bool,
    stance_lb: bool,
    stance_rb: bool,
    contact_lf: bool,
    contact_rf: bool,
    contact_lb: bool,
    contact_rb: bool,
    cmd_vel_x_ms: f64,
    cmd_vel_y_ms: f64,
    cmd_vel_yaw_rads: f64,
    step_x_m: f64,
    step_y_m: f64,
    heading_delta_rad: f64,
}

/// Flat output record written to the archive each cycle.
#[derive(Serialize)]
struct OutputRecord {
    time_s: f64,
    lf_hip_rad: f64,
    lf_upper_rad: f64,
    lf_lower_rad: f64,
    rf_hip_rad: f64,
    rf_upper_rad: f64,
    rf_lower_rad: f64,
    lb_hip_rad: f64,
    lb_upper_rad: f64,
    lb_lower_rad: f64,
    rb_hip_rad: f64,
    rb_upper_rad: f64,
    rb_lower_rad: f64,
    est_vel_x_ms: f64,
    est_vel_y_ms: f64,
    est_vel_yaw_rads: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl InputData {
    /// Input with no new commands and no sensed contacts.
    pub fn at(time: DateTime<Utc>) -> Self {
        Self {
            vel_cmd: None,
            pose_cmd: None,
            contacts: None,
            time,
        }
    }
}

impl LocoCtrl {
    /// Create a new locomotion controller, standing still at the nominal pose.
    ///
    /// Archiving is disabled until `init_archives` is called.
    pub fn new(params: Params, now: DateTime<Utc>) -> Result<Self, LocoCtrlError> {
        let base = QuadBase::new(&params.geometry, params.gait.clone())
            .map_err(LocoCtrlError::InvalidGaitConfig)?;
        let odometry = Odometry::new(&base, now);

        Ok(Self {
            params,
            base,
            body_ctrl: BodyCtrl::new(),
            leg_ctrl: LegCtrl::new(),
            odometry,
            start_time: now,
            last_time: now,
            vel_cmd: Velocities::zero(),
            pose_cmd: Pose::default(),
            report: StatusReport::default(),
            arch_report: Archiver::default(),
            output: None,
            arch_output: Archiver::default(),
        })
    }

    /// Start archiving into the session's `loco_ctrl` directory.
    pub fn init_archives(&mut self, session: &Session) -> Result<(), LocoCtrlError> {
        let mut arch_path = session.arch_root.clone();
        arch_path.push("loco_ctrl");
        std::fs::create_dir_all(arch_path).map_err(LocoCtrlError::ArchiveDirError)?;

        self.arch_report = Archiver::from_path(session, "loco_ctrl/status_report.csv")
            .map_err(LocoCtrlError::ArchiveError)?;
        self.arch_output = Archiver::from_path(session, "loco_ctrl/output.csv")
            .map_err(LocoCtrlError::ArchiveError)?;

        Ok(())
    }

    /// Drop the held commands, stopping the gait and returning to the nominal pose.
    pub fn make_safe(&mut self) {
        self.vel_cmd = Velocities::zero();
        self.pose_cmd = Pose::default();
    }

    /// Apply a new gait configuration. An invalid configuration leaves the current one in use.
    pub fn set_gait_config(&mut self, gait_config: GaitConfig) -> Result<(), LocoCtrlError> {
        self.base
            .set_gait_config(gait_config.clone())
            .map_err(LocoCtrlError::InvalidGaitConfig)?;
        self.params.gait = gait_config;

        debug!("New gait configuration: {:?}", self.params.gait);

        Ok(())
    }

    pub fn gait_config(&self) -> &GaitConfig {
        self.base.gait_config()
    }

    pub fn base(&self) -> &QuadBase {
        &self.base
    }

    pub fn leg_ctrl(&self) -> &LegCtrl {
        &self.leg_ctrl
    }

    pub fn vel_cmd(&self) -> &Velocities {
        &self.vel_cmd
    }

    pub fn pose_cmd(&self) -> &Pose {
        &self.pose_cmd
    }

    /// Output of the last cycle, if one has been run.
    pub fn output(&self) -> Option<&OutputData> {
        self.output.as_ref()
    }

    /// Seconds from construction to the last processed tick.
    fn elapsed_s(&self) -> f64 {
        duration_to_seconds(self.last_time - self.start_time).unwrap_or(0.0)
    }
}

impl State for LocoCtrl {
    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = LocoCtrlError;

    /// Perform cyclic processing of Locomotion Control.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        // Clear the status report
        self.report = StatusReport::default();

        // Replace the held commands with any new ones
        if let Some(v) = input_data.vel_cmd {
            if v != self.vel_cmd {
                debug!("New velocity command: {:?}", v);
            }
            self.vel_cmd = v;
        }
        if let Some(p) = input_data.pose_cmd {
            if p != self.pose_cmd {
                debug!("New pose command: {:?}", p);
            }
            self.pose_cmd = p;
        }

        // ---- FOOT TARGETS ----

        let mut pose = self.pose_cmd;
        pose.position.z += self.base.gait_config().nominal_height;

        let nominal = self.body_ctrl.pose_command(&self.base, &pose);

        let (targets, _) = self.leg_ctrl.velocity_command(
            &mut self.base,
            nominal,
            self.vel_cmd,
            input_data.time,
        );
        self.report.vel_limited = self.leg_ctrl.step_plan().velocity_limited;

        // ---- JOINTS ----

        match kinematics::try_inverse(&self.base, &targets) {
            Ok(joints) => self.base.update_joint_positions(&joints),
            Err(e) => {
                warn!("IK frame rejected, holding joint positions: {}", e);
                self.report.ik_rejected = true;
            }
        }

        // ---- ODOMETRY ----

        let contacts = match input_data.contacts {
            Some(c) => c,
            None => self.base.gait_phases(),
        };
        self.base.set_contacts(contacts);

        let est_vel = self.odometry.get_velocities(&self.base, input_data.time);
        self.base.speed = est_vel;

        self.report.gait_phase = self.base.gait_phases();
        self.report.contacts = contacts;

        // ---- OUTPUT ----

        let mut foot_pos_hip = [[0f64; 3]; NUM_LEGS];
        for (i, leg) in self.base.legs().iter().enumerate() {
            let p = kinematics::transform_to_hip(leg.foot_from_base(), leg).point;
            foot_pos_hip[i] = [p.x, p.y, p.z];
        }

        let output = OutputData {
            joint_pos_rad: self.base.joint_positions(),
            est_vel,
            foot_pos_hip,
        };

        trace!(
            "LocoCtrl output:\n    joints: {:?}\n    est_vel: {:?}",
            output.joint_pos_rad,
            output.est_vel
        );

        self.output = Some(output);
        self.last_time = input_data.time;

        Ok((output, self.report))
    }
}

impl Archived for LocoCtrl {
    fn write(&mut self) -> Result<(), ArchiveError> {
        let time_s = self.elapsed_s();
        let plan = *self.leg_ctrl.step_plan();
        let r = self.report;

        self.arch_report.serialise(StatusRecord {
            time_s,
            ik_rejected: r.ik_rejected,
            vel_limited: r.vel_limited,
            stance_lf: r.gait_phase[0],
            stance_rf: r.gait_phase[1],
            stance_lb: r.gait_phase[2],
            stance_rb: r.gait_phase[3],
            contact_lf: r.contacts[0],
            contact_rf: r.contacts[1],
            contact_lb: r.contacts[2],
            contact_rb: r.contacts[3],
            cmd_vel_x_ms: self.vel_cmd.linear.x,
            cmd_vel_y_ms: self.vel_cmd.linear.y,
            cmd_vel_yaw_rads: self.vel_cmd.angular.z,
            step_x_m: plan.step_x,
            step_y_m: plan.step_y,
            heading_delta_rad: plan.heading_delta,
        })?;

        if let Some(o) = self.output {
            let j = o.joint_pos_rad;
            self.arch_output.serialise(OutputRecord {
                time_s,
                lf_hip_rad: j[0],
                lf_upper_rad: j[1],
                lf_lower_rad: j[2],
                rf_hip_rad: j[3],
                rf_upper_rad: j[4],
                rf_lower_rad: j[5],
                lb_hip_rad: j[6],
                lb_upper_rad: j[7],
                lb_lower_rad: j[8],
                rb_hip_rad: j[9],
                rb_upper_rad: j[10],
                rb_lower_rad: j[11],
                est_vel_x_ms: o.est_vel.linear.x,
                est_vel_y_ms: o.est_vel.linear.y,
                est_vel_yaw_rads: o.est_vel.angular.z,
            })?;
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
