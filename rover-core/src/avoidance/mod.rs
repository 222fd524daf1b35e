//! Obstacle avoidance
//!
//! A tiered threshold policy over the forward distance, and the controller
//! that applies it either as a gate in front of manual drive commands or as
//! an autonomous navigation loop.

pub mod controller;
pub mod policy;

pub use controller::{Gate, ObstacleAvoidance};
pub use policy::{AvoidancePolicy, PolicyError, Tier};
