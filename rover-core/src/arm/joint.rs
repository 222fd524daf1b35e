//! Bounded joint angle

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest joint angle in degrees
pub const MAX_ANGLE: u8 = 180;

/// Servo angle in whole degrees, always within 0-180
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointAngle(u8);

impl JointAngle {
    pub const MIN: JointAngle = JointAngle(0);
    pub const MAX: JointAngle = JointAngle(MAX_ANGLE);

    /// Clamp any integer into the joint range
    pub const fn clamped(degrees: i32) -> Self {
        if degrees < 0 {
            Self(0)
        } else if degrees > MAX_ANGLE as i32 {
            Self(MAX_ANGLE)
        } else {
            Self(degrees as u8)
        }
    }

    pub const fn degrees(self) -> u8 {
        self.0
    }

    /// Angle moved by `delta` degrees, clamped
    pub const fn offset(self, delta: i32) -> Self {
        Self::clamped(self.0 as i32 + delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamping() {
        assert_eq!(JointAngle::clamped(-40), JointAngle::MIN);
        assert_eq!(JointAngle::clamped(270), JointAngle::MAX);
        assert_eq!(JointAngle::clamped(i32::MIN).degrees(), 0);
        assert_eq!(JointAngle::clamped(97).degrees(), 97);
    }

    #[test]
    fn test_offset() {
        assert_eq!(JointAngle::clamped(170).offset(15), JointAngle::MAX);
        assert_eq!(JointAngle::clamped(10).offset(-15), JointAngle::MIN);
        assert_eq!(JointAngle::clamped(90).offset(15).degrees(), 105);
    }
}
