//! Dual H-bridge differential drive
//!
//! Two motor channels (L298N style): each side has two direction inputs and
//! one PWM enable. Side A is the left track, side B the right.
//!
//! ```text
//!              IN1 IN2  IN3 IN4   EN A     EN B
//! forward       H   L    H   L    s        s
//! backward      L   H    L   H    s        s
//! turn left     H   L    H   L    s/2      s
//! turn right    H   L    H   L    s        s/2
//! rotate left   L   H    H   L    s        s
//! rotate right  H   L    L   H    s        s
//! stop          L   L    L   L    0        0
//! ```

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use rover_core::traits::{Drivable, MotorIntent};
use rover_protocol::DriveCommand;

/// Full-scale speed value
const SPEED_SCALE: u16 = 255;

/// Wheel direction on one side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Spin {
    Ahead,
    Astern,
    Off,
}

/// Pins of a dual H-bridge
pub struct DrivePins<IN, EN> {
    pub in1: IN,
    pub in2: IN,
    pub in3: IN,
    pub in4: IN,
    pub en_a: EN,
    pub en_b: EN,
}

/// Differential drive over a dual H-bridge
pub struct DifferentialDrive<IN, EN> {
    pins: DrivePins<IN, EN>,
    intent: MotorIntent,
}

impl<IN: OutputPin, EN: SetDutyCycle> DifferentialDrive<IN, EN> {
    /// Wrap the pins; call [`Drivable::stop`] to put them in a known state
    pub fn new(pins: DrivePins<IN, EN>, speed: u8) -> Self {
        Self {
            pins,
            intent: MotorIntent::stopped(speed),
        }
    }

    pub fn release(self) -> DrivePins<IN, EN> {
        self.pins
    }

    fn drive(&mut self, command: DriveCommand, left: (Spin, u8), right: (Spin, u8)) {
        let pins = &mut self.pins;
        let ok = set_side(&mut pins.in1, &mut pins.in2, &mut pins.en_a, left)
            & set_side(&mut pins.in3, &mut pins.in4, &mut pins.en_b, right);
        if !ok {
            warn!("Drive pin write failed during {:?}", command);
        }
        self.intent.command = command;
    }
}

/// Apply direction and duty to one side; false if any pin failed
fn set_side<IN: OutputPin, EN: SetDutyCycle>(
    fwd: &mut IN,
    rev: &mut IN,
    enable: &mut EN,
    (spin, speed): (Spin, u8),
) -> bool {
    let (fwd_high, rev_high) = match spin {
        Spin::Ahead => (true, false),
        Spin::Astern => (false, true),
        Spin::Off => (false, false),
    };

    let fwd_ok = fwd.set_state(fwd_high.into()).is_ok();
    let rev_ok = rev.set_state(rev_high.into()).is_ok();
    let duty = if spin == Spin::Off { 0 } else { speed };
    let en_ok = enable
        .set_duty_cycle_fraction(duty as u16, SPEED_SCALE)
        .is_ok();

    fwd_ok && rev_ok && en_ok
}

impl<IN: OutputPin, EN: SetDutyCycle> Drivable for DifferentialDrive<IN, EN> {
    fn forward(&mut self) {
        let s = self.intent.speed;
        self.drive(DriveCommand::Forward, (Spin::Ahead, s), (Spin::Ahead, s));
    }

    fn backward(&mut self) {
        let s = self.intent.speed;
        self.drive(DriveCommand::Backward, (Spin::Astern, s), (Spin::Astern, s));
    }

    fn turn_left(&mut self) {
        let s = self.intent.speed;
        self.drive(DriveCommand::TurnLeft, (Spin::Ahead, s / 2), (Spin::Ahead, s));
    }

    fn turn_right(&mut self) {
        let s = self.intent.speed;
        self.drive(DriveCommand::TurnRight, (Spin::Ahead, s), (Spin::Ahead, s / 2));
    }

    fn rotate_left(&mut self) {
        let s = self.intent.speed;
        self.drive(DriveCommand::RotateLeft, (Spin::Astern, s), (Spin::Ahead, s));
    }

    fn rotate_right(&mut self) {
        let s = self.intent.speed;
        self.drive(DriveCommand::RotateRight, (Spin::Ahead, s), (Spin::Astern, s));
    }

    fn stop(&mut self) {
        self.drive(DriveCommand::Stop, (Spin::Off, 0), (Spin::Off, 0));
    }

    fn set_speed(&mut self, speed: u8) {
        self.intent.speed = speed;
    }

    fn speed(&self) -> u8 {
        self.intent.speed
    }

    fn intent(&self) -> MotorIntent {
        self.intent
    }
}
