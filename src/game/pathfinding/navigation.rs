/// Path following.
///
/// Moves agents through their [`Waypoints`], one waypoint at a time, separate
/// from the path request processing in systems.rs.

use bevy::prelude::*;
use crate::game::simulation::{SimConfig, SimPosition, SimVelocity};
use super::components::{PathFollower, Waypoints};
use super::types::WaypointReached;

/// Outcome of one path-following tick for a single agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FollowStep {
    /// Queue is empty; the agent should stand still.
    Idle,
    /// The head waypoint was reached and removed. The agent pauses this tick.
    Arrived(Vec2),
    /// Keep moving with this velocity.
    Moving(Vec2),
}

impl FollowStep {
    pub fn velocity(self) -> Vec2 {
        match self {
            FollowStep::Moving(velocity) => velocity,
            FollowStep::Idle | FollowStep::Arrived(_) => Vec2::ZERO,
        }
    }
}

/// Advance `waypoints` for an agent at `position`.
///
/// Within `arrival_radius` of the head waypoint, the waypoint is popped and
/// the agent halts for this tick; it starts toward the next one on the
/// following tick.
pub fn step_waypoints(
    position: Vec2,
    waypoints: &mut Waypoints,
    speed: f32,
    arrival_radius: f32,
) -> FollowStep {
    let Some(next) = waypoints.front() else {
        return FollowStep::Idle;
    };

    let delta = next - position;
    if delta.length() < arrival_radius {
        waypoints.0.pop_front();
        return FollowStep::Arrived(next);
    }

    FollowStep::Moving(delta.normalize_or_zero() * speed)
}

/// Drive every agent with queued waypoints toward its head waypoint.
pub fn follow_path(
    mut query: Query<(Entity, &SimPosition, &mut SimVelocity, &mut Waypoints, Option<&PathFollower>)>,
    sim_config: Res<SimConfig>,
    mut reached: MessageWriter<WaypointReached>,
) {
    let arrival_radius = sim_config.waypoint_arrival_radius;

    for (entity, pos, mut vel, mut waypoints, follower) in query.iter_mut() {
        let speed = follower.map_or(sim_config.path_speed, |f| f.speed);
        let step = step_waypoints(pos.0, &mut waypoints, speed, arrival_radius);

        vel.0 = step.velocity();

        if let FollowStep::Arrived(position) = step {
            let remaining = waypoints.len();
            debug!("{:?} reached waypoint {:?} ({} remaining)", entity, position, remaining);
            reached.write(WaypointReached { entity, position, remaining });
        }
    }
}

/// Remove drained waypoint queues so finished agents leave the query.
pub fn cleanup_completed_paths(
    mut commands: Commands,
    query: Query<(Entity, &Waypoints)>,
) {
    for (entity, waypoints) in query.iter() {
        if waypoints.is_empty() {
            commands.entity(entity).remove::<Waypoints>();
        }
    }
}
