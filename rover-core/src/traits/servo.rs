//! Joint servo trait

/// Errors from a servo write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServoError {
    /// The PWM peripheral rejected the duty cycle
    Pwm,
}

/// Angle-commanded hobby servo
///
/// Implementations translate whole degrees (0-180) into the control signal.
/// There is no position feedback; a successful write only means the
/// command was issued.
pub trait JointServo {
    /// Command the servo to `degrees`
    ///
    /// Callers clamp to 0-180 before writing.
    fn write_angle(&mut self, degrees: u8) -> Result<(), ServoError>;
}

impl<T: JointServo + ?Sized> JointServo for &mut T {
    fn write_angle(&mut self, degrees: u8) -> Result<(), ServoError> {
        (**self).write_angle(degrees)
    }
}
