//! Obstacle avoidance controller
//!
//! Reads the forward distance and reacts per [`Tier`]:
//!
//! ```text
//!   d <= critical   stop, pause, reverse, rotate right, stop
//!   d <= stop       stop, pause, rotate right, stop
//!   d <= turn       veer right and keep going
//!   d >  turn       gate: let the driver proceed / navigate: forward
//!   no echo         stop and wait for a reading
//! ```
//!
//! The drive and sensor are lent in per call; the manual drive path uses
//! them too.

use embedded_hal::delay::DelayNs;
use rover_hal::Monotonic;

use super::policy::{AvoidancePolicy, PolicyError, Tier};
use crate::config::AvoidanceConfig;
use crate::traits::{Distance, Drivable, RangeSensor};

/// Outcome of a gate check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Gate {
    /// Tier acted on, or `None` if no evaluation took place
    pub tier: Option<Tier>,
    /// Whether the manual command may go ahead
    pub proceed: bool,
}

impl Gate {
    /// Proceed without evaluating
    pub const PASS: Gate = Gate {
        tier: None,
        proceed: true,
    };
}

/// Tiered obstacle avoidance over a borrowed drive and sensor
pub struct ObstacleAvoidance<C, D> {
    policy: AvoidancePolicy,
    config: AvoidanceConfig,
    enabled: bool,
    last_check: Option<u32>,
    last_tier: Option<Tier>,
    clock: C,
    delay: D,
}

impl<C: Monotonic, D: DelayNs> ObstacleAvoidance<C, D> {
    /// Create a disabled controller
    pub fn new(config: AvoidanceConfig, clock: C, delay: D) -> Result<Self, PolicyError> {
        Ok(Self {
            policy: AvoidancePolicy::from_config(&config)?,
            config,
            enabled: false,
            last_check: None,
            last_tier: None,
            clock,
            delay,
        })
    }

    pub fn enable(&mut self) {
        self.enabled = true;
        info!("Obstacle avoidance enabled");
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        info!("Obstacle avoidance disabled");
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn policy(&self) -> &AvoidancePolicy {
        &self.policy
    }

    /// Tier of the most recent evaluation
    pub fn last_tier(&self) -> Option<Tier> {
        self.last_tier
    }

    /// Replace the thresholds
    ///
    /// An unordered set is rejected and the current policy kept.
    pub fn set_distances(
        &mut self,
        critical: Distance,
        stop: Distance,
        turn: Distance,
    ) -> Result<(), PolicyError> {
        self.policy = AvoidancePolicy::new(critical, stop, turn)?;
        info!(
            "Avoidance thresholds: critical {} stop {} turn {} mm",
            critical.mm(),
            stop.mm(),
            turn.mm()
        );
        Ok(())
    }

    /// Gate a manual drive command
    ///
    /// Evaluates at most once per check interval; in between, and while
    /// disabled, the command always proceeds. Blocking tiers run their
    /// maneuver here and withhold the command. The avoid tier starts a right
    /// turn and lets the command through.
    pub fn check<W, R>(&mut self, drive: &mut W, sensor: &mut R) -> Gate
    where
        W: Drivable,
        R: RangeSensor,
    {
        if !self.enabled {
            return Gate::PASS;
        }

        if let Some(last) = self.last_check {
            if self.clock.elapsed_since(last) < self.config.check_interval_ms {
                return Gate::PASS;
            }
        }
        self.last_check = Some(self.clock.now_ms());

        let tier = self.evaluate(sensor);
        match tier {
            Tier::Emergency => self.emergency(drive, self.config.gate_reverse_ms),
            Tier::Stop => self.search(drive),
            Tier::Avoid => drive.turn_right(),
            Tier::Clear => {}
            Tier::Blind => drive.stop(),
        }

        Gate {
            tier: Some(tier),
            proceed: !tier.blocks(),
        }
    }

    /// One step of autonomous driving
    ///
    /// Measures on every call. Returns the tier acted on, or `None` while
    /// disabled.
    pub fn navigate<W, R>(&mut self, drive: &mut W, sensor: &mut R) -> Option<Tier>
    where
        W: Drivable,
        R: RangeSensor,
    {
        if !self.enabled {
            return None;
        }

        let tier = self.evaluate(sensor);
        match tier {
            Tier::Emergency => self.emergency(drive, self.config.nav_reverse_ms),
            Tier::Stop => self.search(drive),
            Tier::Avoid => drive.turn_right(),
            Tier::Clear => drive.forward(),
            Tier::Blind => drive.stop(),
        }
        Some(tier)
    }

    fn evaluate<R: RangeSensor>(&mut self, sensor: &mut R) -> Tier {
        let reading = sensor.filtered_read(self.config.samples);
        let tier = self.policy.classify_reading(reading);

        match reading {
            Ok(distance) if tier != Tier::Clear => {
                debug!("Obstacle at {} mm: {}", distance.mm(), tier.name());
            }
            Ok(_) => {}
            Err(e) => warn!("Distance unavailable ({:?}), holding still", e),
        }

        self.last_tier = Some(tier);
        tier
    }

    /// Back away from an obstacle that is too close
    fn emergency<W: Drivable>(&mut self, drive: &mut W, reverse_ms: u32) {
        warn!("Emergency avoidance");
        drive.stop();
        self.delay.delay_ms(self.config.pause_ms);
        drive.backward();
        self.delay.delay_ms(reverse_ms);
        drive.rotate_right();
        self.delay.delay_ms(self.config.emergency_rotate_ms);
        drive.stop();
    }

    /// Stop and rotate to look for a clear heading
    fn search<W: Drivable>(&mut self, drive: &mut W) {
        info!("Path blocked, searching");
        drive.stop();
        self.delay.delay_ms(self.config.pause_ms);
        drive.rotate_right();
        self.delay.delay_ms(self.config.stop_rotate_ms);
        drive.stop();
    }
}
