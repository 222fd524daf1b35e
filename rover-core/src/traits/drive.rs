//! Differential drive trait

use rover_protocol::DriveCommand;

/// Speed used until `spd` changes it
pub const DEFAULT_SPEED: u8 = 200;

/// Active drive command and the shared speed setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorIntent {
    /// Last applied command (`Stop` when idle)
    pub command: DriveCommand,
    /// Shared speed, 0-255
    pub speed: u8,
}

impl MotorIntent {
    pub const fn stopped(speed: u8) -> Self {
        Self {
            command: DriveCommand::Stop,
            speed,
        }
    }

    /// Whether the wheels are being driven
    pub fn is_moving(&self) -> bool {
        self.command != DriveCommand::Stop
    }
}

impl Default for MotorIntent {
    fn default() -> Self {
        Self::stopped(DEFAULT_SPEED)
    }
}

/// Two-sided differential drive
///
/// Turns keep both sides moving forward with the inner side at half speed;
/// rotations spin the sides in opposite directions at full speed.
///
/// Motor outputs have no failure path the controller could act on, so the
/// methods are infallible. Drivers log pin errors.
pub trait Drivable {
    fn forward(&mut self);
    fn backward(&mut self);
    fn turn_left(&mut self);
    fn turn_right(&mut self);
    fn rotate_left(&mut self);
    fn rotate_right(&mut self);
    fn stop(&mut self);

    /// Store a new speed; it takes effect on the next motion command
    fn set_speed(&mut self, speed: u8);

    fn speed(&self) -> u8;

    /// The currently active command and speed
    fn intent(&self) -> MotorIntent;

    /// Dispatch a [`DriveCommand`] to the matching motion method
    fn apply(&mut self, command: DriveCommand) {
        match command {
            DriveCommand::Forward => self.forward(),
            DriveCommand::Backward => self.backward(),
            DriveCommand::TurnLeft => self.turn_left(),
            DriveCommand::TurnRight => self.turn_right(),
            DriveCommand::RotateLeft => self.rotate_left(),
            DriveCommand::RotateRight => self.rotate_right(),
            DriveCommand::Stop => self.stop(),
        }
    }
}
