//! Control task
//!
//! Owns the [`Robot`] and is its only caller. Waits on either console input
//! or the navigation ticker; whichever fires first is handled to completion
//! before the next wait. A tick that falls due while console input is being
//! handled fires on the next wait.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Output;
use embassy_rp::pwm::PwmOutput;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embassy_time::{Duration, Ticker};
use embedded_io_async::{Read, Write};
use rover_core::Robot;
use rover_drivers::motor::DifferentialDrive;
use rover_drivers::sensor::UltrasonicSensor;
use rover_drivers::servo::PwmServo;

use crate::board::{BlockingDelay, BoardClock, BoardEeprom, EchoPin};
use crate::console::{reply, Line, LineBuffer};

/// Navigation step period
const NAV_TICK_MS: u64 = 50;

type Servo = PwmServo<PwmOutput<'static>>;
type Drive = DifferentialDrive<Output<'static>, PwmOutput<'static>>;
type Ranger = UltrasonicSensor<Output<'static>, EchoPin<'static>, BoardClock, BlockingDelay>;
type Rover = Robot<Servo, Drive, Ranger, BoardEeprom, BoardClock, BlockingDelay>;

#[embassy_executor::task]
pub async fn control_task(mut robot: Rover, mut rx: BufferedUartRx, mut tx: BufferedUartTx) {
    info!("Control task started");
    robot.begin();

    let mut lines = LineBuffer::new();
    let mut chunk = [0u8; 32];
    // Fixed schedule, polled first: a due tick wins over pending input
    let mut nav = Ticker::every(Duration::from_millis(NAV_TICK_MS));

    loop {
        match select(nav.next(), rx.read(&mut chunk)).await {
            Either::Second(Ok(len)) => {
                for &byte in &chunk[..len] {
                    let text = match lines.push(byte) {
                        Some(Line::Text(text)) => text,
                        Some(Line::Overflow) => {
                            warn!("Console line too long");
                            send(&mut tx, b"err too-long\r\n").await;
                            continue;
                        }
                        None => continue,
                    };

                    debug!("> {}", text.as_str());
                    let result = robot.execute_line(&text);
                    send(&mut tx, reply(&result).as_bytes()).await;
                }
            }
            Either::Second(Err(e)) => {
                warn!("Console read error: {:?}", e);
            }
            Either::First(()) => {
                if let Some(tier) = robot.tick() {
                    trace!("Navigation tier: {}", tier);
                }
            }
        }
    }
}

async fn send(tx: &mut BufferedUartTx, bytes: &[u8]) {
    if let Err(e) = tx.write_all(bytes).await {
        warn!("Console write error: {:?}", e);
    }
}
