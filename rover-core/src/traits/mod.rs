//! Hardware capability traits
//!
//! These traits define the interface between the control logic and the
//! concrete drivers in `rover-drivers` (or test doubles).

pub mod drive;
pub mod range;
pub mod servo;

pub use drive::{Drivable, MotorIntent};
pub use range::{Distance, RangeSensor, SensorError};
pub use servo::{JointServo, ServoError};
