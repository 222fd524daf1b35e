//! Persistent storage drivers

pub mod flash_eeprom;

pub use flash_eeprom::FlashEeprom;
