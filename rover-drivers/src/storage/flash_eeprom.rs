//! EEPROM emulation on NOR flash
//!
//! The byte-addressed EEPROM image lives in RAM. A commit stores the whole
//! image as a single `sequential-storage` map item, so successive commits
//! walk across the partition's pages instead of erasing one sector each
//! time. The previous image stays valid until the new item is completely
//! written; a reset during commit reloads the last committed image.

use core::ops::Range;

use embassy_futures::block_on;
use embedded_storage_async::nor_flash::NorFlash;
use rover_hal::{Eeprom, EepromError};
use sequential_storage::cache::NoCache;
use sequential_storage::map;

/// Bytes of emulated EEPROM
pub const EEPROM_SIZE: usize = 256;

/// Map key of the EEPROM image
const IMAGE_KEY: u8 = 0;

/// Item scratch space: image plus key and item header
const ITEM_BUFFER_SIZE: usize = EEPROM_SIZE + 32;

/// Byte-addressed EEPROM over a map partition of NOR flash
///
/// `range` must cover at least two erase pages and be page aligned.
pub struct FlashEeprom<S> {
    flash: S,
    range: Range<u32>,
    mirror: [u8; EEPROM_SIZE],
    dirty: bool,
}

impl<S: NorFlash> FlashEeprom<S> {
    /// Open the partition and load the last committed image
    pub fn new(flash: S, range: Range<u32>) -> Self {
        let mut eeprom = Self {
            flash,
            range,
            mirror: [0xFF; EEPROM_SIZE],
            dirty: false,
        };
        eeprom.load();
        eeprom
    }

    pub fn release(self) -> S {
        self.flash
    }

    fn load(&mut self) {
        let mut buffer = [0u8; ITEM_BUFFER_SIZE];
        let fetched = block_on(map::fetch_item::<u8, &[u8], _>(
            &mut self.flash,
            self.range.clone(),
            &mut NoCache::new(),
            &mut buffer,
            &IMAGE_KEY,
        ));

        match fetched {
            Ok(Some(image)) if image.len() == EEPROM_SIZE => {
                self.mirror.copy_from_slice(image);
                info!("EEPROM image loaded");
            }
            Ok(Some(image)) => {
                warn!("EEPROM image has {} bytes, starting blank", image.len());
            }
            Ok(None) => info!("No EEPROM image, starting blank"),
            Err(_) => {
                warn!("EEPROM partition unreadable, formatting");
                let erased = block_on(self.flash.erase(self.range.start, self.range.end));
                if erased.is_err() {
                    error!("EEPROM partition erase failed");
                }
            }
        }
    }
}

impl<S: NorFlash> Eeprom for FlashEeprom<S> {
    fn capacity(&self) -> usize {
        EEPROM_SIZE
    }

    fn read(&mut self, address: usize, buffer: &mut [u8]) -> Result<(), EepromError> {
        self.check_range(address, buffer.len())?;
        buffer.copy_from_slice(&self.mirror[address..address + buffer.len()]);
        Ok(())
    }

    fn write(&mut self, address: usize, data: &[u8]) -> Result<(), EepromError> {
        self.check_range(address, data.len())?;
        let target = &mut self.mirror[address..address + data.len()];
        if target != data {
            target.copy_from_slice(data);
            self.dirty = true;
        }
        Ok(())
    }

    /// Store the image if it changed; on failure it stays dirty for a retry
    fn commit(&mut self) -> Result<(), EepromError> {
        if !self.dirty {
            return Ok(());
        }

        let mut buffer = [0u8; ITEM_BUFFER_SIZE];
        let image: &[u8] = &self.mirror;
        block_on(map::store_item(
            &mut self.flash,
            self.range.clone(),
            &mut NoCache::new(),
            &mut buffer,
            &IMAGE_KEY,
            &image,
        ))
        .map_err(|_| EepromError::Device)?;

        self.dirty = false;
        debug!("EEPROM committed");
        Ok(())
    }
}
