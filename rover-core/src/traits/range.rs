//! Distance sensing trait

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors from a distance measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// No echo came back within the timeout, or the echo had zero width
    NoEcho,
}

/// Distance in whole millimetres
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Distance(u16);

impl Distance {
    pub const fn from_mm(mm: u16) -> Self {
        Self(mm)
    }

    /// Saturates at `u16::MAX` millimetres
    pub const fn from_cm(cm: u16) -> Self {
        Self(cm.saturating_mul(10))
    }

    /// Convert an echo round-trip time
    ///
    /// Sound covers 0.034 cm/µs; halving for the round trip gives
    /// 0.17 mm per microsecond of echo.
    pub const fn from_echo_us(us: u32) -> Self {
        let mm = us as u64 * 17 / 100;
        if mm > u16::MAX as u64 {
            Self(u16::MAX)
        } else {
            Self(mm as u16)
        }
    }

    pub const fn mm(self) -> u16 {
        self.0
    }

    /// Whole centimetres, rounded down
    pub const fn cm(self) -> u16 {
        self.0 / 10
    }
}

/// Forward-facing range sensor
pub trait RangeSensor {
    /// Distance to the nearest obstacle
    ///
    /// May return a cached value if called again within the sensor's
    /// debounce window.
    fn read(&mut self) -> Result<Distance, SensorError>;

    /// Average of `samples` successive [`read`](RangeSensor::read) calls
    fn filtered_read(&mut self, samples: u8) -> Result<Distance, SensorError>;
}

impl<T: RangeSensor + ?Sized> RangeSensor for &mut T {
    fn read(&mut self) -> Result<Distance, SensorError> {
        (**self).read()
    }

    fn filtered_read(&mut self, samples: u8) -> Result<Distance, SensorError> {
        (**self).filtered_read(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_conversion() {
        // 580 µs round trip is just under 10 cm
        assert_eq!(Distance::from_echo_us(580).mm(), 98);
        assert_eq!(Distance::from_echo_us(0).mm(), 0);
        assert_eq!(Distance::from_echo_us(u32::MAX).mm(), u16::MAX);
    }

    #[test]
    fn test_centimetres() {
        assert_eq!(Distance::from_cm(15).mm(), 150);
        assert_eq!(Distance::from_mm(159).cm(), 15);
        assert_eq!(Distance::from_cm(u16::MAX).mm(), u16::MAX);
        assert!(Distance::from_cm(15) < Distance::from_cm(30));
    }
}
