//! Persisted runtime settings
//!
//! Drive speed and avoidance thresholds survive power cycles. The record is
//! postcard-serialized behind a one-byte length prefix, directly after the
//! pose region of the EEPROM.

use rover_hal::{Eeprom, EepromError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::types::RobotConfig;
use crate::traits::Distance;

/// Magic number to identify a settings record
pub const SETTINGS_MAGIC: u32 = 0x524F_5652; // "ROVR"

/// Current settings record version
pub const SETTINGS_VERSION: u8 = 1;

/// EEPROM offset of the length prefix
pub const SETTINGS_ADDRESS: usize = 64;

/// Space reserved for prefix plus record
pub const SETTINGS_MAX_LEN: usize = 32;

/// Errors from loading or storing settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// EEPROM access failed
    Storage(EepromError),
    /// No record present (blank or erased storage)
    Missing,
    /// Record did not deserialize
    Corrupt,
    /// Magic or version mismatch
    Invalid,
    /// CRC mismatch
    Checksum,
    /// Built without serialization support
    Unsupported,
}

impl From<EepromError> for SettingsError {
    fn from(e: EepromError) -> Self {
        SettingsError::Storage(e)
    }
}

/// Runtime settings record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Settings {
    /// Magic number for validation
    pub magic: u32,
    /// Record format version
    pub version: u8,
    /// Drive speed (0-255)
    pub speed: u8,
    /// Emergency threshold (mm)
    pub critical_mm: u16,
    /// Stop threshold (mm)
    pub stop_mm: u16,
    /// Turn threshold (mm)
    pub turn_mm: u16,
    /// CRC32 over magic..turn_mm
    pub crc: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_config(&RobotConfig::default())
    }
}

impl Settings {
    /// Create a record with a valid header and CRC
    pub fn new(speed: u8, critical: Distance, stop: Distance, turn: Distance) -> Self {
        let mut settings = Self {
            magic: SETTINGS_MAGIC,
            version: SETTINGS_VERSION,
            speed,
            critical_mm: critical.mm(),
            stop_mm: stop.mm(),
            turn_mm: turn.mm(),
            crc: 0,
        };
        settings.update_crc();
        settings
    }

    /// Factory settings for a configuration
    pub fn from_config(config: &RobotConfig) -> Self {
        Self::new(
            config.drive.default_speed,
            Distance::from_mm(config.avoidance.critical_mm),
            Distance::from_mm(config.avoidance.stop_mm),
            Distance::from_mm(config.avoidance.turn_mm),
        )
    }

    /// Check that magic and version match
    pub fn is_valid(&self) -> bool {
        self.magic == SETTINGS_MAGIC && self.version == SETTINGS_VERSION
    }

    /// Thresholds as (critical, stop, turn)
    pub fn thresholds(&self) -> (Distance, Distance, Distance) {
        (
            Distance::from_mm(self.critical_mm),
            Distance::from_mm(self.stop_mm),
            Distance::from_mm(self.turn_mm),
        )
    }

    /// Calculate CRC32 over every field except the CRC itself
    pub fn calculate_crc(&self) -> u32 {
        let mut crc: u32 = 0xFFFF_FFFF;
        crc = crc32_update(crc, &self.magic.to_le_bytes());
        crc = crc32_update(crc, &[self.version, self.speed]);
        crc = crc32_update(crc, &self.critical_mm.to_le_bytes());
        crc = crc32_update(crc, &self.stop_mm.to_le_bytes());
        crc = crc32_update(crc, &self.turn_mm.to_le_bytes());
        !crc
    }

    pub fn update_crc(&mut self) {
        self.crc = self.calculate_crc();
    }

    pub fn verify_crc(&self) -> bool {
        self.crc == self.calculate_crc()
    }

    /// Write the record and commit it
    #[cfg(feature = "serde")]
    pub fn store<E: Eeprom>(&self, eeprom: &mut E) -> Result<(), SettingsError> {
        let mut buf = [0u8; SETTINGS_MAX_LEN];
        let len = postcard::to_slice(self, &mut buf[1..])
            .map_err(|_| SettingsError::Corrupt)?
            .len();
        buf[0] = len as u8;

        eeprom.write(SETTINGS_ADDRESS, &buf[..=len])?;
        eeprom.commit()?;
        Ok(())
    }

    /// Read and validate the stored record
    #[cfg(feature = "serde")]
    pub fn load<E: Eeprom>(eeprom: &mut E) -> Result<Self, SettingsError> {
        let mut prefix = [0u8; 1];
        eeprom.read(SETTINGS_ADDRESS, &mut prefix)?;
        let len = prefix[0] as usize;
        if len == 0 || len >= SETTINGS_MAX_LEN {
            return Err(SettingsError::Missing);
        }

        let mut buf = [0u8; SETTINGS_MAX_LEN];
        eeprom.read(SETTINGS_ADDRESS + 1, &mut buf[..len])?;
        let settings: Settings =
            postcard::from_bytes(&buf[..len]).map_err(|_| SettingsError::Corrupt)?;

        if !settings.is_valid() {
            return Err(SettingsError::Invalid);
        }
        if !settings.verify_crc() {
            return Err(SettingsError::Checksum);
        }
        Ok(settings)
    }

    #[cfg(not(feature = "serde"))]
    pub fn store<E: Eeprom>(&self, _eeprom: &mut E) -> Result<(), SettingsError> {
        Err(SettingsError::Unsupported)
    }

    #[cfg(not(feature = "serde"))]
    pub fn load<E: Eeprom>(_eeprom: &mut E) -> Result<Self, SettingsError> {
        Err(SettingsError::Unsupported)
    }
}

/// CRC32 update (IEEE 802.3 polynomial, reflected)
fn crc32_update(crc: u32, data: &[u8]) -> u32 {
    const POLY: u32 = 0xEDB8_8320;
    let mut crc = crc;

    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLY;
            } else {
                crc >>= 1;
            }
        }
    }

    crc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MemEeprom;

    #[test]
    fn test_crc_detects_change() {
        let mut settings = Settings::default();
        assert!(settings.verify_crc());

        settings.speed = 17;
        assert!(!settings.verify_crc());
        settings.update_crc();
        assert!(settings.verify_crc());
    }

    #[test]
    fn test_crc_known_value() {
        // Standard CRC32 check value
        assert_eq!(!crc32_update(0xFFFF_FFFF, b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn test_defaults_from_config() {
        let settings = Settings::default();
        assert!(settings.is_valid());
        assert_eq!(settings.speed, 200);
        assert_eq!(
            settings.thresholds(),
            (
                Distance::from_cm(15),
                Distance::from_cm(30),
                Distance::from_cm(50)
            )
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_store_and_load() {
        let mut eeprom = MemEeprom::blank();
        let settings = Settings::new(
            120,
            Distance::from_cm(10),
            Distance::from_cm(20),
            Distance::from_cm(40),
        );

        settings.store(&mut eeprom).unwrap();
        assert_eq!(eeprom.commits, 1);
        assert_eq!(Settings::load(&mut eeprom), Ok(settings));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_blank_storage_is_missing() {
        let mut eeprom = MemEeprom::blank();
        assert_eq!(Settings::load(&mut eeprom), Err(SettingsError::Missing));

        let mut zeroed = MemEeprom::zeroed();
        assert_eq!(Settings::load(&mut zeroed), Err(SettingsError::Missing));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_corrupted_record_rejected() {
        let mut eeprom = MemEeprom::blank();
        Settings::default().store(&mut eeprom).unwrap();

        // Flip a bit in the speed byte (after the 5-byte magic varint and version)
        eeprom.bytes[SETTINGS_ADDRESS + 1 + 6] ^= 0x01;
        assert_eq!(Settings::load(&mut eeprom), Err(SettingsError::Checksum));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_wrong_magic_rejected() {
        let mut eeprom = MemEeprom::blank();
        let mut settings = Settings::default();
        settings.magic = 0x1234_5678;
        settings.update_crc();
        settings.store(&mut eeprom).unwrap();

        assert_eq!(Settings::load(&mut eeprom), Err(SettingsError::Invalid));
    }
}
