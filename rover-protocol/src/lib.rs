//! ArmRover command vocabulary
//!
//! This crate defines the text commands accepted by the robot controller.
//! Any transport (serial console, HTTP bridge, replayed macro) hands the
//! controller one line of text, which parses into a [`Command`].
//!
//! # Vocabulary
//!
//! ```text
//! ┌─────────────┬──────────────────────────────────────────────┐
//! │ b± s± e±    │ step base / shoulder / elbow by one step     │
//! │ go gc       │ open / close gripper                         │
//! │ m h|s|p|d|w │ home, scan, pick, drop, wave                 │
//! │ m b|r       │ bow, reach                                   │
//! │ m save N    │ store current pose in slot N                 │
//! │ m pos N     │ move to the pose in slot N                   │
//! │ m list      │ report saved poses                           │
//! │ m angles    │ report current joint angles                  │
//! │ mv bk lt rt │ forward, back, turn left, turn right         │
//! │ rl rr st    │ rotate left, rotate right, stop              │
//! │ spd N       │ drive speed 0-255                            │
//! │ oa on|off   │ obstacle avoidance gate on/off               │
//! │ oa nav      │ autonomous obstacle-avoiding navigation      │
//! │ oa set C S T│ critical/stop/turn thresholds in cm          │
//! │ stream done │ start / stop recording                       │
//! │ play clear  │ replay / clear the recording                 │
//! │ cfg save    │ persist speed and thresholds                 │
//! │ cfg reset   │ restore default speed and thresholds         │
//! └─────────────┴──────────────────────────────────────────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod tokens;

pub use command::{Command, ParseError, COMMAND_TEXT_LEN, MAX_LINE_LEN};
pub use tokens::{
    AvoidanceMode, DriveCommand, GripperAction, Joint, RecordingControl, Routine, SettingsAction,
    StepDirection,
};
