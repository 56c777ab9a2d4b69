/// Component definitions for the simulation layer.
///
/// Position and velocity are the only physics state the navigation and
/// behavior code touches: position is read, velocity is written.

use bevy::prelude::*;

/// Logical position of an entity in world pixels.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct SimPosition(pub Vec2);

/// Desired velocity of an entity in world pixels per second.
///
/// Steering systems write this; [`apply_velocity`](super::physics::apply_velocity)
/// integrates it into [`SimPosition`].
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct SimVelocity(pub Vec2);

/// Position at the start of the current tick, used to interpolate rendering
/// between fixed updates.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct SimPositionPrev(pub Vec2);
