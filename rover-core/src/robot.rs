//! Top-level robot context
//!
//! [`Robot`] owns every actuator, the sensor, pose memory, the macro
//! recorder and the avoidance controller, and dispatches parsed
//! [`Command`]s to them. It is also the only place where component errors
//! become diagnostic lines.
//!
//! ```text
//!  text line ──► Command::parse ──► Robot::execute ──┬─► ArmActuator / PoseLibrary
//!                                       │            ├─► MacroRecorder
//!                                       │            └─► ObstacleAvoidance::check ─► Drivable
//!                                       ▼
//!                                 MacroRecorder (while recording)
//!
//!  Robot::tick ──► ObstacleAvoidance::navigate (navigation mode only)
//! ```

use embedded_hal::delay::DelayNs;
use rover_hal::{Eeprom, Monotonic};
use rover_protocol::{
    AvoidanceMode, Command, DriveCommand, ParseError, RecordingControl, SettingsAction,
};

use crate::arm::{ArmActuator, MacroRecorder, PoseError, PoseLibrary, RecordError};
use crate::avoidance::{Gate, ObstacleAvoidance, PolicyError, Tier};
use crate::config::{RobotConfig, Settings, SettingsError};
use crate::traits::{Distance, Drivable, JointServo, RangeSensor};

/// Errors surfaced by command execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RobotError {
    Parse(ParseError),
    Pose(PoseError),
    Record(RecordError),
    Policy(PolicyError),
    Settings(SettingsError),
}

impl From<ParseError> for RobotError {
    fn from(e: ParseError) -> Self {
        RobotError::Parse(e)
    }
}

impl From<PoseError> for RobotError {
    fn from(e: PoseError) -> Self {
        RobotError::Pose(e)
    }
}

impl From<RecordError> for RobotError {
    fn from(e: RecordError) -> Self {
        RobotError::Record(e)
    }
}

impl From<PolicyError> for RobotError {
    fn from(e: PolicyError) -> Self {
        RobotError::Policy(e)
    }
}

impl From<SettingsError> for RobotError {
    fn from(e: SettingsError) -> Self {
        RobotError::Settings(e)
    }
}

/// Result of a successfully dispatched command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Command carried out
    Done,
    /// Drive command withheld by obstacle avoidance
    Blocked(Tier),
}

/// The whole robot
///
/// Type parameters: joint servo `S`, drive `W`, range sensor `R`, EEPROM
/// `E`, clock `C`, blocking delay `D`.
pub struct Robot<S, W, R, E, C, D> {
    arm: ArmActuator<S, D>,
    poses: PoseLibrary<E>,
    recorder: MacroRecorder,
    avoidance: ObstacleAvoidance<C, D>,
    drive: W,
    sensor: R,
    pacer: D,
    config: RobotConfig,
    navigating: bool,
    replaying: bool,
}

impl<S, W, R, E, C, D> Robot<S, W, R, E, C, D>
where
    S: JointServo,
    W: Drivable,
    R: RangeSensor,
    E: Eeprom,
    C: Monotonic,
    D: DelayNs + Clone,
{
    /// Assemble the robot
    ///
    /// Fails only if the configured avoidance thresholds are unordered.
    /// Nothing moves until [`begin`](Self::begin).
    pub fn new(
        servos: [S; 4],
        mut drive: W,
        sensor: R,
        eeprom: E,
        clock: C,
        delay: D,
        config: RobotConfig,
    ) -> Result<Self, PolicyError> {
        let avoidance = ObstacleAvoidance::new(config.avoidance, clock, delay.clone())?;
        drive.set_speed(config.drive.default_speed);

        Ok(Self {
            arm: ArmActuator::new(servos, delay.clone(), config.arm),
            poses: PoseLibrary::new(eeprom),
            recorder: MacroRecorder::new(),
            avoidance,
            drive,
            sensor,
            pacer: delay,
            config,
            navigating: false,
            replaying: false,
        })
    }

    /// Load persisted state and bring the hardware to a known pose
    pub fn begin(&mut self) {
        if let Err(e) = self.poses.load() {
            warn!("Saved poses unavailable: {:?}", e);
        }
        self.load_settings();
        self.drive.stop();
        self.arm.begin();
        info!("Robot ready");
    }

    /// Parse and execute one line of text
    pub fn execute_line(&mut self, line: &str) -> Result<Outcome, RobotError> {
        let command = Command::parse(line).map_err(|e| {
            warn!("Unrecognised command: {:?}", e);
            RobotError::from(e)
        })?;
        self.execute(command)
    }

    /// Execute a command, recording it first if a recording is running
    ///
    /// Errors are logged here and returned for the transport to report.
    pub fn execute(&mut self, command: Command) -> Result<Outcome, RobotError> {
        if self.recorder.is_recording() && !self.replaying && command.is_recordable() {
            if let Err(e) = self.recorder.record(&command.to_text()) {
                warn!("Command not recorded: {:?}", e);
            }
        }

        let result = self.dispatch(command);
        if let Err(e) = result {
            warn!("Command failed: {:?}", e);
        }
        result
    }

    /// One step of the control loop
    ///
    /// Drives autonomously while in navigation mode; otherwise does nothing.
    pub fn tick(&mut self) -> Option<Tier> {
        if !self.navigating {
            return None;
        }
        self.avoidance.navigate(&mut self.drive, &mut self.sensor)
    }

    pub fn is_navigating(&self) -> bool {
        self.navigating
    }

    pub fn arm(&self) -> &ArmActuator<S, D> {
        &self.arm
    }

    pub fn drive(&self) -> &W {
        &self.drive
    }

    pub fn poses(&self) -> &PoseLibrary<E> {
        &self.poses
    }

    pub fn recorder(&self) -> &MacroRecorder {
        &self.recorder
    }

    pub fn avoidance(&self) -> &ObstacleAvoidance<C, D> {
        &self.avoidance
    }

    /// Backing EEPROM, shared by poses and settings
    pub fn storage(&mut self) -> &mut E {
        self.poses.storage()
    }

    fn dispatch(&mut self, command: Command) -> Result<Outcome, RobotError> {
        match command {
            Command::Joint { joint, direction } => self.arm.move_joint(joint, direction),
            Command::Gripper(action) => self.arm.move_gripper(action),
            Command::Routine(routine) => self.arm.run(routine),
            Command::SavePose(slot) => self.poses.save(slot, self.arm.pose())?,
            Command::RecallPose(slot) => self.poses.execute(slot, &mut self.arm)?,
            Command::ListPoses => self.poses.report(),
            Command::ReportAngles => self.arm.report(),
            Command::Drive(drive) => return Ok(self.manual_drive(drive)),
            Command::Speed(speed) => {
                self.drive.set_speed(speed);
                info!("Speed set to {}", speed);
            }
            Command::Avoidance(mode) => self.set_avoidance(mode),
            Command::AvoidanceDistances {
                critical_cm,
                stop_cm,
                turn_cm,
            } => self.avoidance.set_distances(
                Distance::from_cm(critical_cm),
                Distance::from_cm(stop_cm),
                Distance::from_cm(turn_cm),
            )?,
            Command::Recording(control) => self.recording(control),
            Command::Settings(SettingsAction::Save) => self.save_settings()?,
            Command::Settings(SettingsAction::Reset) => self.reset_settings()?,
        }
        Ok(Outcome::Done)
    }

    /// Apply a manual drive command, gating forward motion
    fn manual_drive(&mut self, command: DriveCommand) -> Outcome {
        if self.navigating {
            self.navigating = false;
            info!("Navigation stopped by manual drive");
        }

        if command.heads_forward() {
            if let Gate {
                tier: Some(tier),
                proceed: false,
            } = self.avoidance.check(&mut self.drive, &mut self.sensor)
            {
                info!("Drive blocked ({})", tier.name());
                return Outcome::Blocked(tier);
            }
        }

        self.drive.apply(command);
        Outcome::Done
    }

    fn set_avoidance(&mut self, mode: AvoidanceMode) {
        match mode {
            AvoidanceMode::On => {
                // Leaving navigation hands the wheels back stopped
                if self.navigating {
                    self.navigating = false;
                    self.drive.stop();
                }
                self.avoidance.enable();
            }
            AvoidanceMode::Off => {
                self.navigating = false;
                self.avoidance.disable();
                self.drive.stop();
            }
            AvoidanceMode::Navigate => {
                self.avoidance.enable();
                self.navigating = true;
                info!("Autonomous navigation started");
            }
        }
    }

    fn recording(&mut self, control: RecordingControl) {
        match control {
            RecordingControl::Start => self.recorder.start(),
            RecordingControl::Stop => self.recorder.stop(),
            RecordingControl::Clear => self.recorder.clear(),
            RecordingControl::Play => self.play(),
        }
    }

    /// Re-dispatch every recorded command without recording it again
    fn play(&mut self) {
        let script = self.recorder.clone();
        let mut pacer = self.pacer.clone();

        self.replaying = true;
        script.replay(&mut pacer, |line| {
            // Failures are already logged by execute
            let _ = self.execute_line(line);
        });
        self.replaying = false;
        info!("Playback complete");
    }

    fn load_settings(&mut self) {
        match Settings::load(self.poses.storage()) {
            Ok(settings) => {
                if let Err(e) = self.apply_settings(&settings) {
                    warn!("Stored thresholds rejected ({:?}), using defaults", e);
                } else {
                    info!("Settings loaded");
                }
            }
            Err(SettingsError::Missing) => debug!("No stored settings"),
            Err(e) => warn!("Stored settings invalid ({:?}), using defaults", e),
        }
    }

    fn apply_settings(&mut self, settings: &Settings) -> Result<(), PolicyError> {
        let (critical, stop, turn) = settings.thresholds();
        self.avoidance.set_distances(critical, stop, turn)?;
        self.drive.set_speed(settings.speed);
        Ok(())
    }

    fn save_settings(&mut self) -> Result<(), SettingsError> {
        let policy = self.avoidance.policy();
        let settings = Settings::new(
            self.drive.speed(),
            policy.critical(),
            policy.stop(),
            policy.turn(),
        );
        settings.store(self.poses.storage())?;
        info!("Settings saved");
        Ok(())
    }

    /// Restore factory speed and thresholds, in memory and in storage
    fn reset_settings(&mut self) -> Result<(), RobotError> {
        let defaults = Settings::from_config(&self.config);
        self.apply_settings(&defaults)?;
        defaults.store(self.poses.storage())?;
        info!("Settings reset to defaults");
        Ok(())
    }
}
