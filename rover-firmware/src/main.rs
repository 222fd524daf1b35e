//! ArmRover - robot firmware
//!
//! RP2040 firmware for a two-wheel differential-drive rover carrying a
//! four-servo arm. Commands arrive as text lines on UART0; everything else
//! (arm choreography, pose memory, macros, obstacle avoidance) lives in
//! `rover-core`.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{Pwm, PwmOutput};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use rover_core::config::RobotConfig;
use rover_core::Robot;
use rover_drivers::motor::{DifferentialDrive, DrivePins};
use rover_drivers::sensor::UltrasonicSensor;
use rover_drivers::servo::{PwmServo, PwmServoConfig};

use crate::board::{BlockingDelay, BoardClock, EchoPin};

mod board;
mod console;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// UART ring buffers must outlive the driver
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Split a PWM slice into its two channel outputs
fn channels(pwm: Pwm<'static>) -> (PwmOutput<'static>, PwmOutput<'static>) {
    match pwm.split() {
        (Some(a), Some(b)) => (a, b),
        _ => defmt::panic!("PWM slice without both channels"),
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("ArmRover firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = RobotConfig::default();

    // Arm servos, 50 Hz
    let (base, shoulder) = channels(Pwm::new_output_ab(
        p.PWM_SLICE1,
        p.PIN_2,
        p.PIN_3,
        board::servo_pwm_config(),
    ));
    let (elbow, gripper) = channels(Pwm::new_output_ab(
        p.PWM_SLICE2,
        p.PIN_4,
        p.PIN_5,
        board::servo_pwm_config(),
    ));
    let servos = [base, shoulder, elbow, gripper]
        .map(|pwm| PwmServo::new(pwm, PwmServoConfig::default()));
    info!("Servos initialized");

    // Drive motors
    let (en_a, en_b) = channels(Pwm::new_output_ab(
        p.PWM_SLICE3,
        p.PIN_6,
        p.PIN_7,
        board::motor_pwm_config(),
    ));
    let drive = DifferentialDrive::new(
        DrivePins {
            in1: Output::new(p.PIN_8, Level::Low),
            in2: Output::new(p.PIN_9, Level::Low),
            in3: Output::new(p.PIN_10, Level::Low),
            in4: Output::new(p.PIN_11, Level::Low),
            en_a,
            en_b,
        },
        config.drive.default_speed,
    );
    info!("Motor driver initialized");

    // Ultrasonic ranger
    let mut sensor = UltrasonicSensor::new(
        Output::new(p.PIN_14, Level::Low),
        EchoPin::new(Input::new(p.PIN_15, Pull::Down)),
        BoardClock,
        BlockingDelay,
        config.sensor,
    );
    sensor.begin();
    info!("Ultrasonic sensor initialized");

    let eeprom = board::eeprom(p.FLASH, p.DMA_CH0);
    info!("EEPROM partition opened");

    // Console, 115200 baud default
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("Console UART initialized");

    let robot = match Robot::new(
        servos,
        drive,
        sensor,
        eeprom,
        BoardClock,
        BlockingDelay,
        config,
    ) {
        Ok(robot) => robot,
        Err(e) => defmt::panic!("Invalid avoidance thresholds: {:?}", e),
    };

    unwrap!(spawner.spawn(tasks::control_task(robot, rx, tx)));
    info!("All tasks spawned, firmware running");
}
