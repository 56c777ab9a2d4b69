/// Velocity integration.
///
/// Stands in for a full rigid-body layer: it consumes the velocity written by
/// steering systems and moves [`SimPosition`] accordingly. No collision
/// response happens here; agents are kept off blocked cells by their paths.

use bevy::prelude::*;
use super::components::*;
use super::resources::*;

/// Snapshot positions before anything moves this tick.
pub fn store_previous_position(
    mut query: Query<(&mut SimPositionPrev, &SimPosition)>,
) {
    for (mut prev, pos) in query.iter_mut() {
        prev.0 = pos.0;
    }
}

/// Apply velocity to position using the fixed tick delta.
pub fn apply_velocity(
    sim_config: Res<SimConfig>,
    mut query: Query<(&mut SimPosition, &SimVelocity)>,
) {
    let delta = sim_config.tick_delta();

    for (mut pos, vel) in query.iter_mut() {
        if vel.0 != Vec2::ZERO {
            pos.0 += vel.0 * delta;
        }
    }
}
