//! Hardware driver implementations
//!
//! Concrete implementations of the capability traits in `rover-core`, built
//! on `embedded-hal` 1.0 and `rover-hal`:
//!
//! - Hobby servo on a 50 Hz PWM channel
//! - L298N-style dual H-bridge differential drive
//! - HC-SR04-style ultrasonic range sensor
//! - Byte-addressed EEPROM emulated on NOR flash

#![no_std]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to later modules
mod fmt;

pub mod motor;
pub mod sensor;
pub mod servo;
pub mod storage;
