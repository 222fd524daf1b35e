//! Echo pulse measurement
//!
//! Pulse-echo rangers (HC-SR04 and friends) answer a trigger pulse by
//! holding their echo line high for the sound's round-trip time. This trait
//! is the "read-echo-pulse-duration" primitive; triggering is done with a
//! plain `embedded_hal::digital::OutputPin`.

/// Errors from echo measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EchoError {
    /// Echo line never went high, or stayed high past the timeout
    Timeout,
}

/// Echo input pin with pulse-width measurement
pub trait EchoInput {
    /// Wait for the next high pulse and return its width in microseconds
    ///
    /// Blocks for at most roughly `timeout_us` (waiting for the rising edge
    /// plus the pulse itself are each bounded by it).
    fn pulse_width_us(&mut self, timeout_us: u32) -> Result<u32, EchoError>;
}

impl<T: EchoInput + ?Sized> EchoInput for &mut T {
    fn pulse_width_us(&mut self, timeout_us: u32) -> Result<u32, EchoError> {
        (**self).pulse_width_us(timeout_us)
    }
}
