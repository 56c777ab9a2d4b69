/// Resource definitions for the simulation.

use bevy::prelude::*;
use crate::game::config::InitialConfig;

// ============================================================================
// Tick Tracking
// ============================================================================

/// Monotonic simulation tick counter, incremented once per FixedUpdate.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct SimTick(pub u64);

impl SimTick {
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

// ============================================================================
// Simulation Configuration
// ============================================================================

/// Runtime simulation parameters derived from [`InitialConfig`].
///
/// This is the single conversion point between the user-facing config file and
/// the values the steering systems consume. Every threshold is in world pixels.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub tick_rate: f64,
    pub path_speed: f32,
    pub waypoint_arrival_radius: f32,
    pub patrol_speed: f32,
    pub patrol_arrival_radius: f32,
    pub chase_speed: f32,
    pub chase_near_distance: f32,
    pub trigger_distance: f32,
    pub hurt_duration: f32,
    pub attack_range: f32,
    pub attack_damage: f32,
    pub player_speed: f32,
    pub pickup_radius: f32,
}

impl SimConfig {
    /// Seconds per simulation tick.
    pub fn tick_delta(&self) -> f32 {
        (1.0 / self.tick_rate) as f32
    }
}

impl From<&InitialConfig> for SimConfig {
    fn from(config: &InitialConfig) -> Self {
        Self {
            tick_rate: config.tick_rate,
            path_speed: config.path_speed,
            waypoint_arrival_radius: config.waypoint_arrival_radius,
            patrol_speed: config.patrol_speed,
            patrol_arrival_radius: config.patrol_arrival_radius,
            chase_speed: config.chase_speed,
            chase_near_distance: config.chase_near_distance,
            trigger_distance: config.trigger_distance,
            hurt_duration: config.hurt_duration,
            attack_range: config.attack_range,
            attack_damage: config.attack_damage,
            player_speed: config.player_speed,
            pickup_radius: config.pickup_radius,
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::from(&InitialConfig::default())
    }
}
