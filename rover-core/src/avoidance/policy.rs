//! Avoidance thresholds and tier classification

use crate::config::AvoidanceConfig;
use crate::traits::{Distance, SensorError};

/// Reaction tier for a distance reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tier {
    /// At or inside the critical distance: back off and turn away
    Emergency,
    /// At or inside the stop distance: stop and search for a new heading
    Stop,
    /// At or inside the turn distance: keep going but veer off
    Avoid,
    /// Nothing within the turn distance
    Clear,
    /// No valid reading: stop and wait for one
    Blind,
}

impl Tier {
    /// Whether this tier takes control away from the driver
    pub const fn blocks(self) -> bool {
        matches!(self, Tier::Emergency | Tier::Stop | Tier::Blind)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Tier::Emergency => "emergency",
            Tier::Stop => "stop",
            Tier::Avoid => "avoid",
            Tier::Clear => "clear",
            Tier::Blind => "blind",
        }
    }
}

/// Errors from building a policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PolicyError {
    /// Thresholds are not strictly increasing (critical < stop < turn)
    Unordered,
}

/// Three strictly ordered distance thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AvoidancePolicy {
    critical: Distance,
    stop: Distance,
    turn: Distance,
}

impl AvoidancePolicy {
    pub fn new(critical: Distance, stop: Distance, turn: Distance) -> Result<Self, PolicyError> {
        if critical < stop && stop < turn {
            Ok(Self {
                critical,
                stop,
                turn,
            })
        } else {
            Err(PolicyError::Unordered)
        }
    }

    pub fn from_config(config: &AvoidanceConfig) -> Result<Self, PolicyError> {
        Self::new(
            Distance::from_mm(config.critical_mm),
            Distance::from_mm(config.stop_mm),
            Distance::from_mm(config.turn_mm),
        )
    }

    /// Tier for a distance; each threshold is inclusive
    pub fn classify(&self, distance: Distance) -> Tier {
        if distance <= self.critical {
            Tier::Emergency
        } else if distance <= self.stop {
            Tier::Stop
        } else if distance <= self.turn {
            Tier::Avoid
        } else {
            Tier::Clear
        }
    }

    /// Tier for a sensor result; a failed reading is [`Tier::Blind`]
    pub fn classify_reading(&self, reading: Result<Distance, SensorError>) -> Tier {
        match reading {
            Ok(distance) => self.classify(distance),
            Err(_) => Tier::Blind,
        }
    }

    pub fn critical(&self) -> Distance {
        self.critical
    }

    pub fn stop(&self) -> Distance {
        self.stop
    }

    pub fn turn(&self) -> Distance {
        self.turn
    }
}
