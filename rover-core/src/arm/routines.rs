//! Canned arm choreographies
//!
//! Each routine is a fixed sequence of absolute moves, so it starts or ends
//! at a known pose and can follow any other routine.

use embedded_hal::delay::DelayNs;
use rover_protocol::{Joint, Routine};

use super::actuator::ArmActuator;
use crate::traits::JointServo;

/// Base angles visited by the scan, in order
const SCAN_ANGLES: [i32; 5] = [0, 45, 90, 135, 180];

/// Extra dwell at each scan angle (ms)
const SCAN_DWELL_MS: u32 = 500;

/// Hold time at the extreme of bow and reach (ms)
const HOLD_MS: u32 = 1000;

/// Pause after reach closes the gripper (ms)
const GRIP_DWELL_MS: u32 = 500;

/// Number of elbow flicks in a wave
const WAVE_COUNT: usize = 3;

impl<S: JointServo, D: DelayNs> ArmActuator<S, D> {
    /// Run a choreography to completion
    pub fn run(&mut self, routine: Routine) {
        debug!("Running {}", routine.name());
        match routine {
            Routine::Home => self.move_home(),
            Routine::Scan => self.scan(),
            Routine::Pick => self.pick(),
            Routine::Drop => self.drop_object(),
            Routine::Wave => self.wave(),
            Routine::Bow => self.bow(),
            Routine::Reach => self.reach(),
        }
    }

    /// Sweep the base across its whole range and return to centre
    pub fn scan(&mut self) {
        self.move_home();
        for angle in SCAN_ANGLES {
            self.move_to_angle(Joint::Base, angle);
            self.pause_ms(SCAN_DWELL_MS);
        }
        let home_base = self.config().home[Joint::Base.index()] as i32;
        self.move_to_angle(Joint::Base, home_base);
        info!("Scan complete");
    }

    /// Open, reach down, grab and lift
    pub fn pick(&mut self) {
        let (open, close) = self.gripper_angles();
        self.move_to_angle(Joint::Gripper, open);
        self.move_to_angle(Joint::Shoulder, 45);
        self.move_to_angle(Joint::Elbow, 45);
        self.move_to_angle(Joint::Gripper, close);
        self.move_to_angle(Joint::Shoulder, 90);
        self.move_to_angle(Joint::Elbow, 90);
        info!("Pick complete");
    }

    /// Swing to the side, lower, release and go home
    pub fn drop_object(&mut self) {
        let (open, _) = self.gripper_angles();
        self.move_to_angle(Joint::Base, 180);
        self.move_to_angle(Joint::Shoulder, 45);
        self.move_to_angle(Joint::Elbow, 45);
        self.move_to_angle(Joint::Gripper, open);
        self.move_home();
        info!("Drop complete");
    }

    pub fn wave(&mut self) {
        self.move_to_angle(Joint::Base, 90);
        self.move_to_angle(Joint::Shoulder, 45);
        self.move_to_angle(Joint::Elbow, 0);
        for _ in 0..WAVE_COUNT {
            self.move_to_angle(Joint::Elbow, 45);
            self.move_to_angle(Joint::Elbow, 0);
        }
        self.move_home();
        info!("Wave complete");
    }

    pub fn bow(&mut self) {
        self.move_home();
        self.move_to_angle(Joint::Shoulder, 60);
        self.move_to_angle(Joint::Elbow, 30);
        self.pause_ms(HOLD_MS);
        self.move_to_angle(Joint::Shoulder, 0);
        self.move_to_angle(Joint::Elbow, 0);
        self.move_home();
        info!("Bow complete");
    }

    /// Stretch out, close the gripper and come back
    pub fn reach(&mut self) {
        let (_, close) = self.gripper_angles();
        self.move_home();
        self.move_to_angle(Joint::Shoulder, 180);
        self.move_to_angle(Joint::Elbow, 135);
        self.pause_ms(HOLD_MS);
        self.move_to_angle(Joint::Gripper, close);
        self.pause_ms(GRIP_DWELL_MS);
        self.move_home();
        info!("Reach complete");
    }

    fn gripper_angles(&self) -> (i32, i32) {
        let config = self.config();
        (config.gripper_open as i32, config.gripper_close as i32)
    }
}
