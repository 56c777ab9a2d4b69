use bevy::prelude::*;

/// Where a path request should lead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathDestination {
    /// The collectible item closest to the requester.
    NearestItem,
    /// The spaceship goal.
    Spaceship,
    /// An explicit world position.
    Point(Vec2),
}

/// Ask for a route from `entity`'s current position to `destination`.
#[derive(Message, Debug, Clone)]
pub struct PathRequest {
    pub entity: Entity,
    pub destination: PathDestination,
}

/// Emitted when a path-following agent arrives at a waypoint.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct WaypointReached {
    pub entity: Entity,
    pub position: Vec2,
    /// Waypoints still queued after this one.
    pub remaining: usize,
}

/// Why a path request was rejected. A rejected request leaves the
/// requester's current waypoints untouched.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PathRequestError {
    #[error("start position {0:?} is off the grid or not walkable")]
    StartNotWalkable(Vec2),

    #[error("goal position {0:?} is off the grid or not walkable")]
    GoalNotWalkable(Vec2),

    #[error("no walkable route from {from:?} to {to:?}")]
    NoRoute { from: Vec2, to: Vec2 },

    #[error("no {0:?} destination exists")]
    NoDestination(PathDestination),

    #[error("requesting entity {0:?} has no position")]
    MissingRequester(Entity),
}
