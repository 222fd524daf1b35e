//! Board-agnostic motion and safety control for the ArmRover
//!
//! This crate contains all control logic that does not depend on specific
//! hardware implementations:
//!
//! - Capability traits (joint servo, differential drive, range sensor)
//! - Arm actuation, canned choreographies and pose memory
//! - Command macro recording
//! - Tiered obstacle avoidance
//! - Configuration and persisted settings
//! - The [`Robot`](robot::Robot) context that dispatches parsed commands

#![no_std]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to later modules
mod fmt;

pub mod arm;
pub mod avoidance;
pub mod config;
pub mod robot;
pub mod traits;

#[cfg(test)]
mod mock;

pub use robot::Robot;
