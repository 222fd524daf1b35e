//! Servo drivers

pub mod pwm_servo;

pub use pwm_servo::{PwmServo, PwmServoConfig};
