//! ArmRover Hardware Abstraction Layer
//!
//! This crate defines the hardware primitives the control core relies on
//! that `embedded-hal` does not already cover. Chip-specific code (the
//! RP2040 firmware, host test doubles) implements them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (rover-firmware, etc.)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  rover-core   │       │ rover-drivers │
//! └───────────────┘       └───────────────┘
//!         │                       │
//!         └───────────┬───────────┘
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  rover-hal (this crate) + embedded-hal  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`eeprom::Eeprom`] - Byte-addressed persistent storage
//! - [`echo::EchoInput`] - Echo pulse width measurement
//! - [`clock::Monotonic`] - Millisecond uptime clock
//!
//! Digital outputs, PWM duty and blocking delays come from `embedded-hal`.

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod echo;
pub mod eeprom;

// Re-export key traits at crate root for convenience
pub use clock::Monotonic;
pub use echo::{EchoError, EchoInput};
pub use eeprom::{Eeprom, EepromError};
