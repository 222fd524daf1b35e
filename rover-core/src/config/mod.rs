//! Configuration types
//!
//! Compile-time defaults for every tunable, plus the small set of runtime
//! settings that persist in EEPROM.

pub mod settings;
pub mod types;

pub use settings::{Settings, SettingsError};
pub use types::*;
