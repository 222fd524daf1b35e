//! Arm control
//!
//! - [`ArmActuator`] owns the four joint servos and their tracked angles
//! - [`routines`] holds the canned choreographies
//! - [`PoseLibrary`] stores numbered poses in EEPROM
//! - [`MacroRecorder`] records command text for later replay

pub mod actuator;
pub mod joint;
pub mod pose;
pub mod recorder;
pub mod routines;

pub use actuator::ArmActuator;
pub use joint::JointAngle;
pub use pose::{Pose, PoseError, PoseLibrary, PoseSlot, POSE_SLOTS};
pub use recorder::{MacroRecorder, RecordError, MACRO_CAPACITY};
