//! Command macro recording
//!
//! The recorder only stores and paces command text. Interpreting each
//! entry on replay is up to the caller.

use embedded_hal::delay::DelayNs;
use heapless::{String, Vec};
use rover_protocol::COMMAND_TEXT_LEN;

/// Maximum recorded commands
pub const MACRO_CAPACITY: usize = 20;

/// Pause before each replayed command (ms)
pub const REPLAY_DELAY_MS: u32 = 500;

/// Errors from recording a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordError {
    /// Recording is not active
    NotRecording,
    /// Buffer already holds [`MACRO_CAPACITY`] commands
    BufferFull,
    /// Command text exceeds [`COMMAND_TEXT_LEN`]
    TooLong,
}

/// Bounded, ordered list of recorded commands
#[derive(Debug, Clone, Default)]
pub struct MacroRecorder {
    entries: Vec<String<COMMAND_TEXT_LEN>, MACRO_CAPACITY>,
    recording: bool,
}

impl MacroRecorder {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            recording: false,
        }
    }

    /// Discard the buffer and start recording
    pub fn start(&mut self) {
        self.entries.clear();
        self.recording = true;
        info!("Recording started");
    }

    /// Stop recording, keeping what was recorded
    pub fn stop(&mut self) {
        self.recording = false;
        info!("Recording stopped. Total commands: {}", self.entries.len());
    }

    /// Append a command while recording
    ///
    /// A full buffer drops the command but recording stays active.
    pub fn record(&mut self, command: &str) -> Result<(), RecordError> {
        if !self.recording {
            return Err(RecordError::NotRecording);
        }
        if self.entries.is_full() {
            return Err(RecordError::BufferFull);
        }

        let mut text = String::new();
        text.push_str(command).map_err(|_| RecordError::TooLong)?;
        self.entries
            .push(text)
            .map_err(|_| RecordError::BufferFull)?;
        trace!("Recorded {}", command);
        Ok(())
    }

    /// Forget every recorded command
    ///
    /// Does not change whether recording is active.
    pub fn clear(&mut self) {
        self.entries.clear();
        info!("Recorded commands cleared");
    }

    /// Hand each entry to `execute`, oldest first, pausing before each
    pub fn replay<D, F>(&self, delay: &mut D, mut execute: F)
    where
        D: DelayNs,
        F: FnMut(&str),
    {
        info!("Executing {} recorded commands", self.entries.len());
        for entry in &self.entries {
            info!("Executing: {}", entry.as_str());
            delay.delay_ms(REPLAY_DELAY_MS);
            execute(entry.as_str());
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Event, Log, SimTime};
    use core::fmt::Write;

    #[test]
    fn test_record_requires_start() {
        let mut recorder = MacroRecorder::new();
        assert_eq!(recorder.record("b+"), Err(RecordError::NotRecording));
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_capacity_bound_keeps_order() {
        let mut recorder = MacroRecorder::new();
        recorder.start();

        let mut dropped = 0;
        for i in 0..25u8 {
            let mut text: String<COMMAND_TEXT_LEN> = String::new();
            write!(text, "m pos {}", i).unwrap();
            if recorder.record(&text) == Err(RecordError::BufferFull) {
                dropped += 1;
            }
        }

        assert_eq!(recorder.len(), MACRO_CAPACITY);
        assert_eq!(dropped, 5);
        assert!(recorder.is_recording());
        for (i, entry) in recorder.entries().enumerate() {
            let mut expected: String<COMMAND_TEXT_LEN> = String::new();
            write!(expected, "m pos {}", i).unwrap();
            assert_eq!(entry, expected.as_str());
        }
    }

    #[test]
    fn test_too_long_rejected() {
        let mut recorder = MacroRecorder::new();
        recorder.start();
        assert_eq!(
            recorder.record("this command is far too long to keep"),
            Err(RecordError::TooLong)
        );
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_start_clears_and_stop_keeps() {
        let mut recorder = MacroRecorder::new();
        recorder.start();
        recorder.record("mv").unwrap();
        recorder.stop();
        assert_eq!(recorder.len(), 1);
        assert_eq!(recorder.record("bk"), Err(RecordError::NotRecording));

        recorder.start();
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_clear_keeps_recording_flag() {
        let mut recorder = MacroRecorder::new();
        recorder.start();
        recorder.record("st").unwrap();
        recorder.clear();
        assert!(recorder.is_empty());
        assert!(recorder.is_recording());
    }

    #[test]
    fn test_replay_order_and_pacing() {
        let log = Log::new();
        let mut delay = SimTime(&log);
        let mut recorder = MacroRecorder::new();
        recorder.start();
        for cmd in ["b+", "go", "mv"] {
            recorder.record(cmd).unwrap();
        }
        recorder.stop();

        let mut seen: Vec<String<COMMAND_TEXT_LEN>, 4> = Vec::new();
        recorder.replay(&mut delay, |cmd| {
            log.push(Event::Measure);
            let mut owned = String::new();
            owned.push_str(cmd).unwrap();
            seen.push(owned).unwrap();
        });

        let seen: Vec<&str, 4> = seen.iter().map(|s| s.as_str()).collect();
        assert_eq!(seen.as_slice(), &["b+", "go", "mv"]);
        // Pause comes before each command
        assert_eq!(
            log.events().as_slice(),
            &[
                Event::Pause(500),
                Event::Measure,
                Event::Pause(500),
                Event::Measure,
                Event::Pause(500),
                Event::Measure,
            ]
        );
    }
}
