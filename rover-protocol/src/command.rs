//! Command parsing and canonical text form
//!
//! Parsing is whitespace-tolerant and case-insensitive. Every [`Command`]
//! also renders back to a canonical line (via `Display`) which parses to
//! the same command; the macro recorder stores commands in that form.

use core::fmt::{self, Write};
use core::str::SplitWhitespace;

use heapless::String;

use crate::tokens::{
    AvoidanceMode, DriveCommand, GripperAction, Joint, RecordingControl, Routine, SettingsAction,
    StepDirection,
};

/// Longest accepted input line
pub const MAX_LINE_LEN: usize = 64;

/// Longest canonical command text ("oa set 65535 65535 65535")
pub const COMMAND_TEXT_LEN: usize = 24;

/// Longest keyword the parser has to compare
const MAX_WORD_LEN: usize = 8;

/// Errors from command parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Line was blank
    Empty,
    /// Line exceeds [`MAX_LINE_LEN`]
    TooLong,
    /// First word is not a known command
    UnknownCommand,
    /// Command word is known but its argument is not
    UnknownArgument,
    /// A required argument is missing
    MissingArgument,
    /// An argument that should be a number is not one
    InvalidNumber,
    /// Extra words after a complete command
    UnexpectedArgument,
}

/// A decoded controller command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Step a joint (`b+`, `s-`, `e+`)
    Joint {
        joint: Joint,
        direction: StepDirection,
    },
    /// Set the gripper (`go`, `gc`)
    Gripper(GripperAction),
    /// Run a canned choreography (`m h`, `m s`, ...)
    Routine(Routine),
    /// Store the current pose (`m save N`)
    SavePose(u8),
    /// Move to a stored pose (`m pos N`)
    RecallPose(u8),
    /// Report stored poses (`m list`)
    ListPoses,
    /// Report current joint angles (`m angles`)
    ReportAngles,
    /// Manual drive (`mv`, `bk`, `lt`, `rt`, `rl`, `rr`, `st`)
    Drive(DriveCommand),
    /// Set drive speed (`spd N`), already clamped to 0-255
    Speed(u8),
    /// Switch obstacle avoidance (`oa on|off|nav`)
    Avoidance(AvoidanceMode),
    /// Set avoidance thresholds in centimetres (`oa set C S T`)
    AvoidanceDistances {
        critical_cm: u16,
        stop_cm: u16,
        turn_cm: u16,
    },
    /// Macro recording control (`stream`, `done`, `play`, `clear`)
    Recording(RecordingControl),
    /// Settings persistence (`cfg save`, `cfg reset`)
    Settings(SettingsAction),
}

impl Command {
    /// Parse one line of input
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseError::Empty);
        }
        if line.len() > MAX_LINE_LEN {
            return Err(ParseError::TooLong);
        }

        let mut words = line.split_whitespace();
        let head = words.next().ok_or(ParseError::Empty)?;
        let command = parse_words(head, &mut words)?;

        if words.next().is_some() {
            return Err(ParseError::UnexpectedArgument);
        }
        Ok(command)
    }

    /// Whether this command belongs in a recorded macro
    ///
    /// Recording controls, settings and reports are not replayable actions.
    pub const fn is_recordable(&self) -> bool {
        !matches!(
            self,
            Command::Recording(_)
                | Command::Settings(_)
                | Command::ListPoses
                | Command::ReportAngles
        )
    }

    /// Canonical text for this command
    pub fn to_text(&self) -> String<COMMAND_TEXT_LEN> {
        let mut text = String::new();
        // Canonical forms never exceed COMMAND_TEXT_LEN
        let _ = write!(text, "{}", self);
        text
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Joint { joint, direction } => {
                write!(f, "{}{}", joint.letter(), direction.sign())
            }
            Command::Gripper(action) => write!(f, "g{}", action.letter()),
            Command::Routine(routine) => write!(f, "m {}", routine.letter()),
            Command::SavePose(slot) => write!(f, "m save {}", slot),
            Command::RecallPose(slot) => write!(f, "m pos {}", slot),
            Command::ListPoses => f.write_str("m list"),
            Command::ReportAngles => f.write_str("m angles"),
            Command::Drive(drive) => f.write_str(drive.token()),
            Command::Speed(speed) => write!(f, "spd {}", speed),
            Command::Avoidance(mode) => write!(f, "oa {}", mode.token()),
            Command::AvoidanceDistances {
                critical_cm,
                stop_cm,
                turn_cm,
            } => write!(f, "oa set {} {} {}", critical_cm, stop_cm, turn_cm),
            Command::Recording(control) => f.write_str(control.token()),
            Command::Settings(SettingsAction::Save) => f.write_str("cfg save"),
            Command::Settings(SettingsAction::Reset) => f.write_str("cfg reset"),
        }
    }
}

/// Lower-case a keyword for matching
///
/// Words longer than any keyword cannot match, so they become `None`.
fn keyword(word: &str) -> Option<String<MAX_WORD_LEN>> {
    let mut out = String::new();
    for c in word.chars() {
        out.push(c.to_ascii_lowercase()).ok()?;
    }
    Some(out)
}

fn parse_words(head: &str, words: &mut SplitWhitespace<'_>) -> Result<Command, ParseError> {
    let key = keyword(head).ok_or(ParseError::UnknownCommand)?;

    if let Some(drive) = DriveCommand::from_token(&key) {
        return Ok(Command::Drive(drive));
    }

    match key.as_str() {
        "m" => parse_arm_macro(words),
        "spd" => parse_speed(words.next()).map(Command::Speed),
        "oa" => parse_avoidance(words),
        "stream" => Ok(Command::Recording(RecordingControl::Start)),
        "done" => Ok(Command::Recording(RecordingControl::Stop)),
        "play" => Ok(Command::Recording(RecordingControl::Play)),
        "clear" => Ok(Command::Recording(RecordingControl::Clear)),
        "cfg" => match keyword_arg(words)?.as_str() {
            "save" => Ok(Command::Settings(SettingsAction::Save)),
            "reset" => Ok(Command::Settings(SettingsAction::Reset)),
            _ => Err(ParseError::UnknownArgument),
        },
        _ => parse_joint(&key, words),
    }
}

/// Joint and gripper tokens, compact (`b+`, `go`) or split (`b +`, `g o`)
fn parse_joint(key: &str, words: &mut SplitWhitespace<'_>) -> Result<Command, ParseError> {
    let mut chars = key.chars();
    let joint = chars
        .next()
        .and_then(Joint::from_letter)
        .ok_or(ParseError::UnknownCommand)?;

    let suffix = match chars.next() {
        Some(c) => {
            if chars.next().is_some() {
                return Err(ParseError::UnknownCommand);
            }
            c
        }
        None => {
            let arg = words.next().ok_or(ParseError::MissingArgument)?;
            let mut arg_chars = arg.chars();
            match (arg_chars.next(), arg_chars.next()) {
                (Some(c), None) => c,
                _ => return Err(ParseError::UnknownArgument),
            }
        }
    };

    if joint == Joint::Gripper {
        GripperAction::from_letter(suffix)
            .map(Command::Gripper)
            .ok_or(ParseError::UnknownArgument)
    } else {
        StepDirection::from_sign(suffix)
            .map(|direction| Command::Joint { joint, direction })
            .ok_or(ParseError::UnknownArgument)
    }
}

fn parse_arm_macro(words: &mut SplitWhitespace<'_>) -> Result<Command, ParseError> {
    let arg = keyword_arg(words)?;
    match arg.as_str() {
        "pos" => Ok(Command::RecallPose(parse_number(words.next())?)),
        "save" => Ok(Command::SavePose(parse_number(words.next())?)),
        "list" => Ok(Command::ListPoses),
        "angles" => Ok(Command::ReportAngles),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Routine::from_letter(c)
                    .map(Command::Routine)
                    .ok_or(ParseError::UnknownArgument),
                _ => Err(ParseError::UnknownArgument),
            }
        }
    }
}

fn parse_avoidance(words: &mut SplitWhitespace<'_>) -> Result<Command, ParseError> {
    match keyword_arg(words)?.as_str() {
        "on" => Ok(Command::Avoidance(AvoidanceMode::On)),
        "off" => Ok(Command::Avoidance(AvoidanceMode::Off)),
        "nav" => Ok(Command::Avoidance(AvoidanceMode::Navigate)),
        "set" => Ok(Command::AvoidanceDistances {
            critical_cm: parse_number(words.next())?,
            stop_cm: parse_number(words.next())?,
            turn_cm: parse_number(words.next())?,
        }),
        _ => Err(ParseError::UnknownArgument),
    }
}

fn keyword_arg(words: &mut SplitWhitespace<'_>) -> Result<String<MAX_WORD_LEN>, ParseError> {
    let word = words.next().ok_or(ParseError::MissingArgument)?;
    keyword(word).ok_or(ParseError::UnknownArgument)
}

fn parse_number<T: core::str::FromStr>(word: Option<&str>) -> Result<T, ParseError> {
    word.ok_or(ParseError::MissingArgument)?
        .parse()
        .map_err(|_| ParseError::InvalidNumber)
}

/// Parse a speed, saturating into 0-255 however many digits it has
fn parse_speed(word: Option<&str>) -> Result<u8, ParseError> {
    let word = word.ok_or(ParseError::MissingArgument)?;
    let (negative, digits) = match word.as_bytes().first() {
        Some(b'-') => (true, &word[1..]),
        Some(b'+') => (false, &word[1..]),
        _ => (false, word),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidNumber);
    }

    let magnitude = digits.bytes().fold(0u16, |acc, b| {
        acc.saturating_mul(10)
            .saturating_add((b - b'0') as u16)
            .min(u8::MAX as u16 + 1)
    });
    if negative {
        Ok(0)
    } else {
        Ok(magnitude.min(u8::MAX as u16) as u8)
    }
}
