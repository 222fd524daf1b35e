//! Byte-addressed persistent storage
//!
//! Models an Arduino-style EEPROM: a small, flat array of bytes that survives
//! power cycles. Implementations may buffer writes in RAM (flash emulation,
//! ESP32 NVS) and only persist on [`Eeprom::commit`].

/// Errors from EEPROM operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EepromError {
    /// Address range falls outside the device
    OutOfBounds,
    /// Underlying device failed
    Device,
}

/// Persistent byte storage
///
/// Writes are not transactional: a power loss between [`Eeprom::write`] and
/// the end of [`Eeprom::commit`] can leave a partially updated image.
pub trait Eeprom {
    /// Total addressable size in bytes
    fn capacity(&self) -> usize;

    /// Read `buffer.len()` bytes starting at `address`
    fn read(&mut self, address: usize, buffer: &mut [u8]) -> Result<(), EepromError>;

    /// Write `data` starting at `address`
    fn write(&mut self, address: usize, data: &[u8]) -> Result<(), EepromError>;

    /// Flush buffered writes to the physical medium
    ///
    /// Devices that write through can rely on the default no-op.
    fn commit(&mut self) -> Result<(), EepromError> {
        Ok(())
    }

    /// Check that `len` bytes at `address` fit inside the device
    fn check_range(&self, address: usize, len: usize) -> Result<(), EepromError> {
        match address.checked_add(len) {
            Some(end) if end <= self.capacity() => Ok(()),
            _ => Err(EepromError::OutOfBounds),
        }
    }
}

impl<T: Eeprom + ?Sized> Eeprom for &mut T {
    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn read(&mut self, address: usize, buffer: &mut [u8]) -> Result<(), EepromError> {
        (**self).read(address, buffer)
    }

    fn write(&mut self, address: usize, data: &[u8]) -> Result<(), EepromError> {
        (**self).write(address, data)
    }

    fn commit(&mut self) -> Result<(), EepromError> {
        (**self).commit()
    }
}
