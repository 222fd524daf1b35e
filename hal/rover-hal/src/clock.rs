//! Monotonic clock abstraction
//!
//! Time gating in the control core compares the current uptime against a
//! stored timestamp. Timestamps are milliseconds in a `u32` and wrap after
//! ~49 days, so all comparisons go through [`Monotonic::elapsed_since`].

/// Millisecond uptime clock
pub trait Monotonic {
    /// Milliseconds since an arbitrary fixed origin (usually boot)
    fn now_ms(&self) -> u32;

    /// Milliseconds elapsed since `earlier`, tolerant of counter wrap
    fn elapsed_since(&self, earlier: u32) -> u32 {
        self.now_ms().wrapping_sub(earlier)
    }
}

impl<T: Monotonic + ?Sized> Monotonic for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct FixedClock(Cell<u32>);

    impl Monotonic for FixedClock {
        fn now_ms(&self) -> u32 {
            self.0.get()
        }
    }

    #[test]
    fn test_elapsed_since() {
        let clock = FixedClock(Cell::new(1_500));
        assert_eq!(clock.elapsed_since(1_000), 500);
        assert_eq!(clock.elapsed_since(1_500), 0);
    }

    #[test]
    fn test_elapsed_across_wrap() {
        let clock = FixedClock(Cell::new(40));
        assert_eq!(clock.elapsed_since(u32::MAX - 59), 100);
    }

    #[test]
    fn test_reference_forwards() {
        let clock = FixedClock(Cell::new(7));
        let by_ref = &clock;
        assert_eq!(by_ref.now_ms(), 7);
        clock.0.set(9);
        assert_eq!(by_ref.elapsed_since(7), 2);
    }
}
