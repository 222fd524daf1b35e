//! Board glue for the RP2040
//!
//! Pin map (Pico-style board):
//!
//! | Function        | GPIO | Peripheral          |
//! |-----------------|------|---------------------|
//! | Console TX/RX   | 0/1  | UART0, 115200 8N1   |
//! | Base / shoulder | 2/3  | PWM slice 1 A/B     |
//! | Elbow / gripper | 4/5  | PWM slice 2 A/B     |
//! | Motor EN A / B  | 6/7  | PWM slice 3 A/B     |
//! | IN1..IN4        | 8-11 | GPIO out            |
//! | Sonar trigger   | 14   | GPIO out            |
//! | Sonar echo      | 15   | GPIO in             |

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash, ERASE_SIZE};
use embassy_rp::gpio::Input;
use embassy_rp::peripherals::FLASH;
use embassy_rp::pwm::Config as PwmConfig;
use embassy_rp::Peri;
use embassy_time::{block_for, Duration, Instant};
use embedded_hal::delay::DelayNs;
use fixed::FixedU16;
use rover_drivers::storage::FlashEeprom;
use rover_hal::{EchoError, EchoInput, Monotonic};

/// 2 MB on-board QSPI flash
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Flash reserved for EEPROM images at the end of the part
const STORAGE_SIZE: usize = 4 * ERASE_SIZE;

/// Map partition holding the EEPROM image
const STORAGE_RANGE: core::ops::Range<u32> =
    ((FLASH_SIZE - STORAGE_SIZE) as u32)..(FLASH_SIZE as u32);

/// Emulated EEPROM on the on-board flash
pub type BoardEeprom = FlashEeprom<Flash<'static, FLASH, Async, FLASH_SIZE>>;

/// 125 MHz / 64 = 1.953125 MHz; 39062 counts per 20 ms frame
const SERVO_DIVIDER: u8 = 64;
const SERVO_TOP: u16 = 39_061;

/// 125 MHz / 125 = 1 MHz; 1000 counts per 1 ms period
const MOTOR_DIVIDER: u8 = 125;
const MOTOR_TOP: u16 = 999;

/// 50 Hz PWM for hobby servos
pub fn servo_pwm_config() -> PwmConfig {
    let mut config = PwmConfig::default();
    config.divider = FixedU16::from_num(SERVO_DIVIDER);
    config.top = SERVO_TOP;
    config
}

/// 1 kHz PWM for the motor enables, starting at 0% duty
pub fn motor_pwm_config() -> PwmConfig {
    let mut config = PwmConfig::default();
    config.divider = FixedU16::from_num(MOTOR_DIVIDER);
    config.top = MOTOR_TOP;
    config.compare_a = 0;
    config.compare_b = 0;
    config
}

/// Uptime from the embassy time driver
#[derive(Debug, Clone, Copy, Default)]
pub struct BoardClock;

impl Monotonic for BoardClock {
    fn now_ms(&self) -> u32 {
        Instant::now().as_millis() as u32
    }
}

/// Busy-wait delay on the embassy time driver
///
/// Every actuator settle in the control core blocks, so this spins rather
/// than yielding to the executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockingDelay;

impl DelayNs for BlockingDelay {
    fn delay_ns(&mut self, ns: u32) {
        block_for(Duration::from_nanos(ns as u64));
    }

    fn delay_us(&mut self, us: u32) {
        block_for(Duration::from_micros(us as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        block_for(Duration::from_millis(ms as u64));
    }
}

/// Echo line of the ultrasonic ranger, timed by polling
pub struct EchoPin<'d> {
    pin: Input<'d>,
}

impl<'d> EchoPin<'d> {
    pub fn new(pin: Input<'d>) -> Self {
        Self { pin }
    }
}

impl EchoInput for EchoPin<'_> {
    fn pulse_width_us(&mut self, timeout_us: u32) -> Result<u32, EchoError> {
        let timeout = Duration::from_micros(timeout_us as u64);

        let waiting = Instant::now();
        while self.pin.is_low() {
            if waiting.elapsed() >= timeout {
                return Err(EchoError::Timeout);
            }
        }

        let rise = Instant::now();
        while self.pin.is_high() {
            if rise.elapsed() >= timeout {
                return Err(EchoError::Timeout);
            }
        }

        Ok(rise.elapsed().as_micros() as u32)
    }
}

/// Open the EEPROM partition at the end of flash
pub fn eeprom(flash: Peri<'static, FLASH>, dma: Peri<'static, impl Channel>) -> BoardEeprom {
    FlashEeprom::new(Flash::new(flash, dma), STORAGE_RANGE)
}
