//! Serial console framing
//!
//! Bytes arrive from UART0 and are assembled into lines terminated by CR or
//! LF. Each executed line gets a one-line reply: `ok`, `blocked <tier>` or
//! `err <reason>`.

use core::fmt::Write;

use heapless::String;
use rover_core::robot::{Outcome, RobotError};
use rover_protocol::MAX_LINE_LEN;

/// Longest reply line, including CR LF
pub const REPLY_LEN: usize = 32;

/// A completed input line
pub enum Line {
    Text(String<MAX_LINE_LEN>),
    /// The line exceeded [`MAX_LINE_LEN`] and was discarded
    Overflow,
}

/// Accumulates console bytes into lines
#[derive(Default)]
pub struct LineBuffer {
    buf: String<MAX_LINE_LEN>,
    overflow: bool,
}

impl LineBuffer {
    pub const fn new() -> Self {
        Self {
            buf: String::new(),
            overflow: false,
        }
    }

    /// Feed one byte; returns a line when a terminator arrives
    pub fn push(&mut self, byte: u8) -> Option<Line> {
        match byte {
            b'\r' | b'\n' => {
                let line = if self.overflow {
                    Some(Line::Overflow)
                } else if self.buf.is_empty() {
                    None
                } else {
                    Some(Line::Text(self.buf.clone()))
                };
                self.buf.clear();
                self.overflow = false;
                line
            }
            // Printable ASCII only
            0x20..=0x7E => {
                if self.buf.push(byte as char).is_err() {
                    self.overflow = true;
                }
                None
            }
            _ => None,
        }
    }
}

/// Reply line for an executed command
pub fn reply(result: &Result<Outcome, RobotError>) -> String<REPLY_LEN> {
    let mut out = String::new();
    let _ = match result {
        Ok(Outcome::Done) => out.push_str("ok"),
        Ok(Outcome::Blocked(tier)) => write!(out, "blocked {}", tier.name()).map_err(|_| ()),
        Err(e) => out.push_str("err ").and_then(|_| out.push_str(reason(e))),
    };
    let _ = out.push_str("\r\n");
    out
}

fn reason(error: &RobotError) -> &'static str {
    match error {
        RobotError::Parse(_) => "parse",
        RobotError::Pose(_) => "pose",
        RobotError::Record(_) => "record",
        RobotError::Policy(_) => "thresholds",
        RobotError::Settings(_) => "settings",
    }
}
