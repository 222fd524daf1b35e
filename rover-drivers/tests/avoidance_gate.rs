//! Avoidance gate driving a real ultrasonic ranger

use std::cell::Cell;
use std::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use rover_core::avoidance::{ObstacleAvoidance, Tier};
use rover_core::config::{AvoidanceConfig, SensorConfig};
use rover_core::traits::{Drivable, MotorIntent};
use rover_drivers::sensor::UltrasonicSensor;
use rover_hal::{EchoError, EchoInput, Monotonic};
use rover_protocol::DriveCommand;

/// Round trip of an obstacle 1.7 m away
const FAR_ECHO_US: u32 = 10_000;

#[derive(Default)]
struct Bench {
    now_us: Cell<u64>,
    pings: Cell<u32>,
}

impl Bench {
    fn advance_ms(&self, ms: u64) {
        self.now_us.set(self.now_us.get() + ms * 1_000);
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

struct Echo;

impl EchoInput for Echo {
    fn pulse_width_us(&mut self, _timeout_us: u32) -> Result<u32, EchoError> {
        Ok(FAR_ECHO_US)
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

/// Drive that only remembers its last command
struct Wheels(MotorIntent);

impl Drivable for Wheels {
    fn forward(&mut self) {
        self.0.command = DriveCommand::Forward;
    }

    fn backward(&mut self) {
        self.0.command = DriveCommand::Backward;
    }

    fn turn_left(&mut self) {
        self.0.command = DriveCommand::TurnLeft;
    }

    fn turn_right(&mut self) {
        self.0.command = DriveCommand::TurnRight;
    }

    fn rotate_left(&mut self) {
        self.0.command = DriveCommand::RotateLeft;
    }

    fn rotate_right(&mut self) {
        self.0.command = DriveCommand::RotateRight;
    }

    fn stop(&mut self) {
        self.0.command = DriveCommand::Stop;
    }

    fn set_speed(&mut self, speed: u8) {
        self.0.speed = speed;
    }

    fn speed(&self) -> u8 {
        self.0.speed
    }

    fn intent(&self) -> MotorIntent {
        self.0
    }
}

#[test]
fn back_to_back_checks_ping_once() {
    let bench = Bench::default();
    let mut sensor = UltrasonicSensor::new(
        Trigger(&bench),
        Echo,
        Time(&bench),
        Time(&bench),
        SensorConfig::default(),
    );
    let mut gate =
        ObstacleAvoidance::new(AvoidanceConfig::default(), Time(&bench), Time(&bench)).unwrap();
    gate.enable();
    let mut wheels = Wheels(MotorIntent::default());

    // Three samples 10 ms apart all fall inside one 50 ms debounce window
    let first = gate.check(&mut wheels, &mut sensor);
    assert_eq!(first.tier, Some(Tier::Clear));
    assert!(first.proceed);
    assert_eq!(bench.pings.get(), 1);

    bench.advance_ms(10);
    let second = gate.check(&mut wheels, &mut sensor);
    assert_eq!(second.tier, None);
    assert!(second.proceed);
    assert_eq!(bench.pings.get(), 1);

    bench.advance_ms(100);
    let third = gate.check(&mut wheels, &mut sensor);
    assert_eq!(third.tier, Some(Tier::Clear));
    assert_eq!(bench.pings.get(), 2);
    assert!(!wheels.intent().is_moving());
}
