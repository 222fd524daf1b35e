//! Arm actuator
//!
//! Owns the four joint servos and the angle last commanded to each. There is
//! no feedback from the servos, so the tracked angle is the only notion of
//! position the rest of the system has. It changes only after a successful
//! servo write.

use embedded_hal::delay::DelayNs;
use rover_protocol::{GripperAction, Joint, StepDirection};

use super::joint::JointAngle;
use super::pose::Pose;
use crate::config::ArmConfig;
use crate::traits::JointServo;

/// Four-joint arm (base, shoulder, elbow, gripper)
pub struct ArmActuator<S, D> {
    servos: [S; 4],
    delay: D,
    angles: [JointAngle; 4],
    config: ArmConfig,
}

impl<S: JointServo, D: DelayNs> ArmActuator<S, D> {
    /// Create an arm whose tracked angles start at the home pose
    ///
    /// `servos` are indexed by [`Joint::index`]. Nothing is written until
    /// [`begin`](Self::begin).
    pub fn new(servos: [S; 4], delay: D, config: ArmConfig) -> Self {
        Self {
            servos,
            delay,
            angles: config.home.map(|deg| JointAngle::clamped(deg as i32)),
            config,
        }
    }

    /// Push the tracked angles out to the servos
    pub fn begin(&mut self) {
        for joint in Joint::ALL {
            let angle = self.angles[joint.index()];
            self.write(joint, angle);
        }
    }

    /// Step one joint by the configured increment
    ///
    /// The result is clamped to 0-180. If clamping leaves the angle where it
    /// was, nothing is written. The gripper only has discrete positions, see
    /// [`move_gripper`](Self::move_gripper).
    pub fn move_joint(&mut self, joint: Joint, direction: StepDirection) {
        if joint == Joint::Gripper {
            warn!("gripper has no step mode");
            return;
        }

        let current = self.angle(joint);
        let step = self.config.step_deg as i32;
        let target = match direction {
            StepDirection::Up => current.offset(step),
            StepDirection::Down => current.offset(-step),
        };

        if target == current {
            debug!("{} at limit ({})", joint.name(), current.degrees());
            return;
        }

        if self.write(joint, target) {
            trace!("{} -> {}", joint.name(), target.degrees());
            self.delay.delay_ms(self.config.step_settle_ms);
        }
    }

    /// Open or close the gripper
    pub fn move_gripper(&mut self, action: GripperAction) {
        let target = match action {
            GripperAction::Open => self.config.gripper_open,
            GripperAction::Close => self.config.gripper_close,
        };
        if self.write(Joint::Gripper, JointAngle::clamped(target as i32)) {
            match action {
                GripperAction::Open => info!("Gripper opened"),
                GripperAction::Close => info!("Gripper closed"),
            }
        }
    }

    /// Move a joint straight to `target` and wait for it to settle
    ///
    /// The target is clamped; no intermediate angles are written.
    pub fn move_to_angle(&mut self, joint: Joint, target: i32) {
        let target = JointAngle::clamped(target);
        self.write(joint, target);
        self.delay.delay_ms(self.config.settle_ms);
    }

    /// Move every joint to the home pose, base first
    pub fn move_home(&mut self) {
        let home = self.config.home;
        for joint in Joint::ALL {
            self.move_to_angle(joint, home[joint.index()] as i32);
        }
        info!("Moved to home position");
    }

    /// Move every joint to `pose`, base first
    pub fn move_to_pose(&mut self, pose: &Pose) {
        for joint in Joint::ALL {
            self.move_to_angle(joint, pose.angle(joint).degrees() as i32);
        }
    }

    /// Block for `ms` milliseconds
    pub fn pause_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    pub fn angle(&self, joint: Joint) -> JointAngle {
        self.angles[joint.index()]
    }

    pub fn angles(&self) -> [JointAngle; 4] {
        self.angles
    }

    /// Snapshot of the current angles
    pub fn pose(&self) -> Pose {
        Pose::new(self.angles)
    }

    pub fn config(&self) -> &ArmConfig {
        &self.config
    }

    /// Whether the gripper sits at its "open" angle
    pub fn gripper_open(&self) -> bool {
        self.angle(Joint::Gripper).degrees() == self.config.gripper_open
    }

    /// Log the current angles
    pub fn report(&self) {
        let [base, shoulder, elbow, gripper] = self.angles;
        let state = if self.gripper_open() { "Open" } else { "Closed" };
        info!(
            "Base: {} Shoulder: {} Elbow: {} Gripper: {} ({})",
            base.degrees(),
            shoulder.degrees(),
            elbow.degrees(),
            gripper.degrees(),
            state
        );
    }

    /// Write one servo, tracking the angle only if the write went through
    fn write(&mut self, joint: Joint, angle: JointAngle) -> bool {
        match self.servos[joint.index()].write_angle(angle.degrees()) {
            Ok(()) => {
                self.angles[joint.index()] = angle;
                true
            }
            Err(e) => {
                warn!("{} servo write failed: {:?}", joint.name(), e);
                false
            }
        }
    }
}
