//! Configuration type definitions
//!
//! Defaults reproduce the timings and angles the robot was tuned with.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::traits::drive::DEFAULT_SPEED;

/// Arm motion configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArmConfig {
    /// Degrees moved by one joint step
    pub step_deg: u8,
    /// Pause after a single step (ms)
    pub step_settle_ms: u32,
    /// Pause after an absolute move (ms)
    pub settle_ms: u32,
    /// Gripper angle for "open"
    pub gripper_open: u8,
    /// Gripper angle for "close"
    pub gripper_close: u8,
    /// Home pose, base to gripper
    pub home: [u8; 4],
}

impl Default for ArmConfig {
    fn default() -> Self {
        Self {
            step_deg: 15,
            step_settle_ms: 15,
            settle_ms: 500,
            gripper_open: 90,
            gripper_close: 60,
            home: [90, 90, 90, 90],
        }
    }
}

/// Drive configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DriveConfig {
    /// Speed at power-on (0-255)
    pub default_speed: u8,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            default_speed: DEFAULT_SPEED,
        }
    }
}

/// Ultrasonic sensor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorConfig {
    /// Minimum time between physical measurements (ms)
    pub debounce_ms: u32,
    /// Pause between samples of a filtered read (ms)
    pub sample_pause_ms: u32,
    /// Give up on an echo after this long (µs)
    pub echo_timeout_us: u32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 50,
            sample_pause_ms: 10,
            echo_timeout_us: 30_000,
        }
    }
}

/// Obstacle avoidance configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AvoidanceConfig {
    /// Emergency threshold (mm)
    pub critical_mm: u16,
    /// Stop threshold (mm)
    pub stop_mm: u16,
    /// Turn threshold (mm)
    pub turn_mm: u16,
    /// Samples averaged per evaluation
    pub samples: u8,
    /// Minimum time between gate evaluations (ms)
    pub check_interval_ms: u32,
    /// Pause after the initial stop of a maneuver (ms)
    pub pause_ms: u32,
    /// Reverse time of the gate's emergency maneuver (ms)
    pub gate_reverse_ms: u32,
    /// Reverse time of the navigator's emergency maneuver (ms)
    pub nav_reverse_ms: u32,
    /// Rotation time after reversing (ms)
    pub emergency_rotate_ms: u32,
    /// Rotation time of the stop-tier path search (ms)
    pub stop_rotate_ms: u32,
}

impl Default for AvoidanceConfig {
    fn default() -> Self {
        Self {
            critical_mm: 150,
            stop_mm: 300,
            turn_mm: 500,
            samples: 3,
            check_interval_ms: 100,
            pause_ms: 100,
            gate_reverse_ms: 500,
            nav_reverse_ms: 1000,
            emergency_rotate_ms: 750,
            stop_rotate_ms: 500,
        }
    }
}

/// Complete robot configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RobotConfig {
    pub arm: ArmConfig,
    pub drive: DriveConfig,
    pub sensor: SensorConfig,
    pub avoidance: AvoidanceConfig,
}
