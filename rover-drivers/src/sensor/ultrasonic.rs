//! HC-SR04 style ultrasonic ranger
//!
//! A 10 µs trigger pulse starts a ping; the echo line is then held high for
//! the round-trip time of the sound. Physical measurements are rate limited:
//! a read inside the debounce window returns the previous result.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use rover_core::config::SensorConfig;
use rover_core::traits::{Distance, RangeSensor, SensorError};
use rover_hal::{EchoInput, Monotonic};

/// Trigger settle time before the pulse (µs)
const TRIGGER_SETTLE_US: u32 = 2;
/// Trigger pulse width (µs)
const TRIGGER_PULSE_US: u32 = 10;

/// Ultrasonic ranger on a trigger output and an echo input
pub struct UltrasonicSensor<T, E, C, D> {
    trigger: T,
    echo: E,
    clock: C,
    delay: D,
    config: SensorConfig,
    /// Time of the last physical measurement
    last_read: Option<u32>,
    last: Result<Distance, SensorError>,
}

impl<T, E, C, D> UltrasonicSensor<T, E, C, D>
where
    T: OutputPin,
    E: EchoInput,
    C: Monotonic,
    D: DelayNs,
{
    pub fn new(trigger: T, echo: E, clock: C, delay: D, config: SensorConfig) -> Self {
        Self {
            trigger,
            echo,
            clock,
            delay,
            config,
            last_read: None,
            last: Err(SensorError::NoEcho),
        }
    }

    /// Drive the trigger low so the first ping starts clean
    pub fn begin(&mut self) {
        if self.trigger.set_low().is_err() {
            warn!("Ultrasonic trigger unavailable");
        }
    }

    /// Fire one ping and time the echo, ignoring the debounce window
    pub fn measure(&mut self) -> Result<Distance, SensorError> {
        self.pulse_trigger()?;

        match self.echo.pulse_width_us(self.config.echo_timeout_us) {
            Ok(0) | Err(_) => {
                trace!("No echo");
                Err(SensorError::NoEcho)
            }
            Ok(us) => Ok(Distance::from_echo_us(us)),
        }
    }

    fn pulse_trigger(&mut self) -> Result<(), SensorError> {
        self.trigger.set_low().map_err(|_| SensorError::NoEcho)?;
        self.delay.delay_us(TRIGGER_SETTLE_US);
        self.trigger.set_high().map_err(|_| SensorError::NoEcho)?;
        self.delay.delay_us(TRIGGER_PULSE_US);
        self.trigger.set_low().map_err(|_| SensorError::NoEcho)
    }

    fn debounced(&self) -> bool {
        self.last_read
            .is_some_and(|at| self.clock.elapsed_since(at) < self.config.debounce_ms)
    }
}

impl<T, E, C, D> RangeSensor for UltrasonicSensor<T, E, C, D>
where
    T: OutputPin,
    E: EchoInput,
    C: Monotonic,
    D: DelayNs,
{
    fn read(&mut self) -> Result<Distance, SensorError> {
        if self.debounced() {
            return self.last;
        }

        self.last_read = Some(self.clock.now_ms());
        self.last = self.measure();
        self.last
    }

    /// Mean of the valid samples; a sample count of 0 reads once
    fn filtered_read(&mut self, samples: u8) -> Result<Distance, SensorError> {
        let mut total: u32 = 0;
        let mut valid: u32 = 0;

        for _ in 0..samples.max(1) {
            if let Ok(distance) = self.read() {
                total += distance.mm() as u32;
                valid += 1;
            }
            self.delay.delay_ms(self.config.sample_pause_ms);
        }

        if valid == 0 {
            return Err(SensorError::NoEcho);
        }
        Ok(Distance::from_mm((total / valid) as u16))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::{Cell, RefCell};
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;
    use rover_hal::EchoError;

    /// Shared microsecond timeline for the clock, the delay and the echo
    struct Bench {
        now_us: Cell<u64>,
        pings: Cell<u32>,
        echoes: RefCell<heapless::Deque<Result<u32, EchoError>, 16>>,
    }

    impl Bench {
        fn new(echoes: &[Result<u32, EchoError>]) -> Self {
            let mut queue = heapless::Deque::new();
            for echo in echoes {
                queue.push_back(*echo).unwrap();
            }
            Self {
                now_us: Cell::new(0),
                pings: Cell::new(0),
                echoes: RefCell::new(queue),
            }
        }

        fn advance_ms(&self, ms: u32) {
            self.now_us.set(self.now_us.get() + ms as u64 * 1_000);
        }
    }

    struct Trigger<'a>(&'a Bench);

    impl ErrorType for Trigger<'_> {
        type Error = Infallible;
    }

    impl OutputPin for Trigger<'_> {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.0.pings.set(self.0.pings.get() + 1);
            Ok(())
        }
    }

    struct Echo<'a>(&'a Bench);

    impl EchoInput for Echo<'_> {
        fn pulse_width_us(&mut self, _timeout_us: u32) -> Result<u32, EchoError> {
            self.0
                .echoes
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(EchoError::Timeout))
        }
    }

    #[derive(Clone, Copy)]
    struct Time<'a>(&'a Bench);

    impl Monotonic for Time<'_> {
        fn now_ms(&self) -> u32 {
            (self.0.now_us.get() / 1_000) as u32
        }
    }

    impl DelayNs for Time<'_> {
        fn delay_ns(&mut self, ns: u32) {
            let now = self.0.now_us.get();
            self.0.now_us.set(now + (ns as u64).div_ceil(1_000));
        }
    }

    type Sensor<'a> = UltrasonicSensor<Trigger<'a>, Echo<'a>, Time<'a>, Time<'a>>;

    fn sensor(bench: &Bench) -> Sensor<'_> {
        UltrasonicSensor::new(
            Trigger(bench),
            Echo(bench),
            Time(bench),
            Time(bench),
            SensorConfig::default(),
        )
    }

    #[test]
    fn test_echo_to_distance() {
        let bench = Bench::new(&[Ok(1_000)]);
        let mut ranger = sensor(&bench);
        assert_eq!(ranger.read(), Ok(Distance::from_mm(170)));
        assert_eq!(bench.pings.get(), 1);
    }

    #[test]
    fn test_no_echo() {
        let bench = Bench::new(&[Ok(0), Err(EchoError::Timeout)]);
        let mut ranger = sensor(&bench);
        assert_eq!(ranger.measure(), Err(SensorError::NoEcho));
        assert_eq!(ranger.measure(), Err(SensorError::NoEcho));
    }

    #[test]
    fn test_debounce_returns_cached() {
        let bench = Bench::new(&[Ok(1_000), Ok(2_000)]);
        let mut ranger = sensor(&bench);

        assert_eq!(ranger.read(), Ok(Distance::from_mm(170)));
        bench.advance_ms(30);
        assert_eq!(ranger.read(), Ok(Distance::from_mm(170)));
        assert_eq!(bench.pings.get(), 1);

        bench.advance_ms(30);
        assert_eq!(ranger.read(), Ok(Distance::from_mm(340)));
        assert_eq!(bench.pings.get(), 2);
    }

    #[test]
    fn test_debounce_caches_failures() {
        let bench = Bench::new(&[Err(EchoError::Timeout), Ok(1_000)]);
        let mut ranger = sensor(&bench);

        assert_eq!(ranger.read(), Err(SensorError::NoEcho));
        assert_eq!(ranger.read(), Err(SensorError::NoEcho));
        assert_eq!(bench.pings.get(), 1);
    }

    #[test]
    fn test_filtered_read_averages_valid_samples() {
        let mut config = SensorConfig::default();
        config.debounce_ms = 0;
        let bench = Bench::new(&[Ok(1_000), Err(EchoError::Timeout), Ok(2_000)]);
        let mut ranger = UltrasonicSensor::new(
            Trigger(&bench),
            Echo(&bench),
            Time(&bench),
            Time(&bench),
            config,
        );

        assert_eq!(ranger.filtered_read(3), Ok(Distance::from_mm(255)));
        assert_eq!(bench.pings.get(), 3);
    }

    #[test]
    fn test_filtered_read_all_invalid() {
        let bench = Bench::new(&[]);
        let mut ranger = sensor(&bench);
        assert_eq!(ranger.filtered_read(0), Err(SensorError::NoEcho));
        assert_eq!(bench.pings.get(), 1);
    }
}
