//! Numbered pose memory
//!
//! # Storage layout
//!
//! ```text
//! offset  0: slot 1 angles (4 × i32 LE), offset 16: slot 1 used flag
//! offset 17: slot 2 angles,              offset 33: slot 2 used flag
//! offset 34: slot 3 angles,              offset 50: slot 3 used flag
//! ```
//!
//! A flag byte of `1` marks the slot used; anything else (erased 0xFF,
//! zeroed storage) reads as unused. All three records are rewritten on
//! every save. There is no checksum, so a write torn by power loss can
//! leave a record and its flag out of step.

use embedded_hal::delay::DelayNs;
use rover_hal::{Eeprom, EepromError};
use rover_protocol::Joint;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::actuator::ArmActuator;
use super::joint::JointAngle;
use crate::traits::JointServo;

/// Number of pose slots, numbered from 1
pub const POSE_SLOTS: usize = 3;

/// Encoded size of one pose
pub const POSE_BYTES: usize = 16;

/// Distance between consecutive slot records
pub const SLOT_STRIDE: usize = POSE_BYTES + 1;

/// Bytes occupied by all slot records
pub const POSE_REGION_LEN: usize = SLOT_STRIDE * POSE_SLOTS;

const USED_FLAG: u8 = 1;
const UNUSED_FLAG: u8 = 0;

/// Errors from pose operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PoseError {
    /// Slot number outside 1..=3
    InvalidSlot(u8),
    /// Slot has never been saved
    NotSaved(u8),
    /// EEPROM access failed
    Storage(EepromError),
}

impl From<EepromError> for PoseError {
    fn from(e: EepromError) -> Self {
        PoseError::Storage(e)
    }
}

/// Snapshot of all four joint angles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose([JointAngle; 4]);

impl Pose {
    pub const fn new(angles: [JointAngle; 4]) -> Self {
        Self(angles)
    }

    pub const fn angle(&self, joint: Joint) -> JointAngle {
        self.0[joint.index()]
    }

    pub const fn angles(&self) -> [JointAngle; 4] {
        self.0
    }

    /// Encode as four little-endian `i32` values
    pub fn to_bytes(&self) -> [u8; POSE_BYTES] {
        let mut out = [0u8; POSE_BYTES];
        for (chunk, angle) in out.chunks_exact_mut(4).zip(self.0) {
            chunk.copy_from_slice(&(angle.degrees() as i32).to_le_bytes());
        }
        out
    }

    /// Decode, clamping each angle into range
    pub fn from_bytes(bytes: &[u8; POSE_BYTES]) -> Self {
        let mut angles = [JointAngle::MIN; 4];
        for (angle, chunk) in angles.iter_mut().zip(bytes.chunks_exact(4)) {
            let raw = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            *angle = JointAngle::clamped(raw);
        }
        Self(angles)
    }
}

/// One pose slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PoseSlot {
    pub pose: Pose,
    pub used: bool,
}

/// Fixed set of pose slots backed by EEPROM
pub struct PoseLibrary<E> {
    eeprom: E,
    slots: [PoseSlot; POSE_SLOTS],
}

impl<E: Eeprom> PoseLibrary<E> {
    /// Create a library with every slot empty
    ///
    /// Call [`load`](Self::load) to pick up what is stored.
    pub fn new(eeprom: E) -> Self {
        Self {
            eeprom,
            slots: [PoseSlot::default(); POSE_SLOTS],
        }
    }

    /// Read all slot records from storage
    ///
    /// On a read error the in-memory slots are left untouched.
    pub fn load(&mut self) -> Result<(), PoseError> {
        let mut region = [0u8; POSE_REGION_LEN];
        self.eeprom.read(0, &mut region)?;

        for (slot, record) in self.slots.iter_mut().zip(region.chunks_exact(SLOT_STRIDE)) {
            let mut angles = [0u8; POSE_BYTES];
            angles.copy_from_slice(&record[..POSE_BYTES]);
            slot.used = record[POSE_BYTES] == USED_FLAG;
            slot.pose = if slot.used {
                Pose::from_bytes(&angles)
            } else {
                Pose::default()
            };
        }

        debug!("Loaded {} saved poses", self.used_count());
        Ok(())
    }

    /// Store `pose` in slot `number` (1-based) and persist all slots
    ///
    /// The in-memory slot is updated even if persisting fails.
    pub fn save(&mut self, number: u8, pose: Pose) -> Result<(), PoseError> {
        let index = slot_index(number)?;
        self.slots[index] = PoseSlot { pose, used: true };
        self.persist()?;
        info!("Position {} saved", number);
        Ok(())
    }

    /// Pose stored in slot `number`
    pub fn get(&self, number: u8) -> Result<Pose, PoseError> {
        let slot = self.slots[slot_index(number)?];
        if slot.used {
            Ok(slot.pose)
        } else {
            Err(PoseError::NotSaved(number))
        }
    }

    /// Drive the arm to the pose in slot `number`
    ///
    /// An empty or invalid slot moves nothing.
    pub fn execute<S, D>(&self, number: u8, arm: &mut ArmActuator<S, D>) -> Result<(), PoseError>
    where
        S: JointServo,
        D: DelayNs,
    {
        let pose = self.get(number)?;
        arm.move_to_pose(&pose);
        info!("Moved to position {}", number);
        Ok(())
    }

    pub fn slots(&self) -> &[PoseSlot; POSE_SLOTS] {
        &self.slots
    }

    pub fn used_count(&self) -> usize {
        self.slots.iter().filter(|s| s.used).count()
    }

    /// Log every slot
    pub fn report(&self) {
        for (i, slot) in self.slots.iter().enumerate() {
            let number = i + 1;
            if slot.used {
                let [b, s, e, g] = slot.pose.angles();
                info!(
                    "{}: B{} S{} E{} G{}",
                    number,
                    b.degrees(),
                    s.degrees(),
                    e.degrees(),
                    g.degrees()
                );
            } else {
                info!("{}: [Empty]", number);
            }
        }
    }

    /// The backing storage, for other records that share the device
    pub fn storage(&mut self) -> &mut E {
        &mut self.eeprom
    }

    fn persist(&mut self) -> Result<(), PoseError> {
        let mut region = [0u8; POSE_REGION_LEN];
        for (slot, record) in self.slots.iter().zip(region.chunks_exact_mut(SLOT_STRIDE)) {
            record[..POSE_BYTES].copy_from_slice(&slot.pose.to_bytes());
            record[POSE_BYTES] = if slot.used { USED_FLAG } else { UNUSED_FLAG };
        }

        self.eeprom.write(0, &region)?;
        self.eeprom.commit()?;
        Ok(())
    }
}

fn slot_index(number: u8) -> Result<usize, PoseError> {
    match number as usize {
        n @ 1..=POSE_SLOTS => Ok(n - 1),
        _ => Err(PoseError::InvalidSlot(number)),
    }
}
