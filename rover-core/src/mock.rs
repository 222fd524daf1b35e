//! Test doubles shared by the unit tests
//!
//! Every double appends to one [`Log`], so tests can assert on the exact
//! interleaving of servo writes, drive commands, pauses and measurements.

use core::cell::{Cell, RefCell};

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use rover_hal::{Eeprom, EepromError, Monotonic};
use rover_protocol::DriveCommand;

use crate::traits::{
    Distance, Drivable, JointServo, MotorIntent, RangeSensor, SensorError, ServoError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Servo { joint: usize, angle: u8 },
    Drive(DriveCommand),
    Pause(u32),
    Measure,
}

pub struct Log {
    events: RefCell<Vec<Event, 512>>,
    now_us: Cell<u64>,
}

impl Log {
    pub fn new() -> Self {
        Self {
            events: RefCell::new(Vec::new()),
            now_us: Cell::new(0),
        }
    }

    pub fn push(&self, event: Event) {
        let _ = self.events.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event, 512> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn servo_writes(&self) -> Vec<(usize, u8), 512> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match *e {
                Event::Servo { joint, angle } => Some((joint, angle)),
                _ => None,
            })
            .collect()
    }

    pub fn drive_commands(&self) -> Vec<DriveCommand, 512> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match *e {
                Event::Drive(command) => Some(command),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, event: Event) -> usize {
        self.events.borrow().iter().filter(|&&e| e == event).count()
    }

    /// Move simulated time without logging a pause
    pub fn advance_ms(&self, ms: u32) {
        self.now_us.set(self.now_us.get() + ms as u64 * 1000);
    }
}

/// Simulated time: a clock that only moves when something pauses
#[derive(Clone, Copy)]
pub struct SimTime<'a>(pub &'a Log);

impl Monotonic for SimTime<'_> {
    fn now_ms(&self) -> u32 {
        (self.0.now_us.get() / 1000) as u32
    }
}

impl DelayNs for SimTime<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.0.now_us.set(self.0.now_us.get() + ns.div_ceil(1000) as u64);
    }

    fn delay_us(&mut self, us: u32) {
        self.0.now_us.set(self.0.now_us.get() + us as u64);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.push(Event::Pause(ms));
        self.0.advance_ms(ms);
    }
}

pub struct MockServo<'a> {
    pub joint: usize,
    pub log: &'a Log,
    pub fail: bool,
}

impl JointServo for MockServo<'_> {
    fn write_angle(&mut self, degrees: u8) -> Result<(), ServoError> {
        if self.fail {
            return Err(ServoError::Pwm);
        }
        self.log.push(Event::Servo {
            joint: self.joint,
            angle: degrees,
        });
        Ok(())
    }
}

pub fn servos(log: &Log) -> [MockServo<'_>; 4] {
    [0, 1, 2, 3].map(|joint| MockServo {
        joint,
        log,
        fail: false,
    })
}

pub struct MockDrive<'a> {
    pub log: &'a Log,
    pub intent: MotorIntent,
}

impl<'a> MockDrive<'a> {
    pub fn new(log: &'a Log) -> Self {
        Self {
            log,
            intent: MotorIntent::default(),
        }
    }

    fn record(&mut self, command: DriveCommand) {
        self.intent.command = command;
        self.log.push(Event::Drive(command));
    }
}

impl Drivable for MockDrive<'_> {
    fn forward(&mut self) {
        self.record(DriveCommand::Forward);
    }

    fn backward(&mut self) {
        self.record(DriveCommand::Backward);
    }

    fn turn_left(&mut self) {
        self.record(DriveCommand::TurnLeft);
    }

    fn turn_right(&mut self) {
        self.record(DriveCommand::TurnRight);
    }

    fn rotate_left(&mut self) {
        self.record(DriveCommand::RotateLeft);
    }

    fn rotate_right(&mut self) {
        self.record(DriveCommand::RotateRight);
    }

    fn stop(&mut self) {
        self.record(DriveCommand::Stop);
    }

    fn set_speed(&mut self, speed: u8) {
        self.intent.speed = speed;
    }

    fn speed(&self) -> u8 {
        self.intent.speed
    }

    fn intent(&self) -> MotorIntent {
        self.intent
    }
}

/// Range sensor that always reports a scripted value
pub struct ScriptedSensor<'a> {
    pub log: &'a Log,
    pub reading: Result<Distance, SensorError>,
}

impl<'a> ScriptedSensor<'a> {
    pub fn at_cm(log: &'a Log, cm: u16) -> Self {
        Self {
            log,
            reading: Ok(Distance::from_cm(cm)),
        }
    }

    pub fn set_cm(&mut self, cm: u16) {
        self.reading = Ok(Distance::from_cm(cm));
    }
}

impl RangeSensor for ScriptedSensor<'_> {
    fn read(&mut self) -> Result<Distance, SensorError> {
        self.log.push(Event::Measure);
        self.reading
    }

    fn filtered_read(&mut self, _samples: u8) -> Result<Distance, SensorError> {
        self.read()
    }
}

pub struct MemEeprom {
    pub bytes: [u8; 256],
    pub writes: usize,
    pub commits: usize,
    pub fail_writes: bool,
}

impl MemEeprom {
    /// Erased flash reads as 0xFF
    pub fn blank() -> Self {
        Self::filled(0xFF)
    }

    pub fn zeroed() -> Self {
        Self::filled(0x00)
    }

    fn filled(byte: u8) -> Self {
        Self {
            bytes: [byte; 256],
            writes: 0,
            commits: 0,
            fail_writes: false,
        }
    }
}

impl Eeprom for MemEeprom {
    fn capacity(&self) -> usize {
        self.bytes.len()
    }

    fn read(&mut self, address: usize, buffer: &mut [u8]) -> Result<(), EepromError> {
        self.check_range(address, buffer.len())?;
        buffer.copy_from_slice(&self.bytes[address..address + buffer.len()]);
        Ok(())
    }

    fn write(&mut self, address: usize, data: &[u8]) -> Result<(), EepromError> {
        if self.fail_writes {
            return Err(EepromError::Device);
        }
        self.check_range(address, data.len())?;
        self.bytes[address..address + data.len()].copy_from_slice(data);
        self.writes += 1;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), EepromError> {
        self.commits += 1;
        Ok(())
    }
}
