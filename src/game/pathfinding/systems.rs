use bevy::prelude::*;
use std::collections::VecDeque;
use crate::game::items::{Item, Spaceship};
use crate::game::map::MapGraph;
use crate::game::simulation::SimPosition;
use super::astar::AStarPathfinder;
use super::components::Waypoints;
use super::types::{PathDestination, PathRequest, PathRequestError};

/// Plan a route between two world positions.
///
/// Both positions must resolve to walkable cells. On success the returned
/// queue holds the world center of every node after the start cell, ending at
/// the goal cell.
pub fn plan_route(
    pathfinder: &mut AStarPathfinder,
    graph: &MapGraph,
    from: Vec2,
    to: Vec2,
) -> Result<VecDeque<Vec2>, PathRequestError> {
    let start = graph.node_at_world_position(from)
        .ok_or(PathRequestError::StartNotWalkable(from))?;
    let goal = graph.node_at_world_position(to)
        .ok_or(PathRequestError::GoalNotWalkable(to))?;

    let nodes = pathfinder.find_path(graph, start, goal);
    if nodes.is_empty() {
        return Err(PathRequestError::NoRoute { from, to });
    }

    Ok(nodes.into_iter().map(|node| graph.to_world_position(node)).collect())
}

/// Pick the world position a request should lead to.
pub fn resolve_destination(
    destination: PathDestination,
    from: Vec2,
    items: &Query<&SimPosition, With<Item>>,
    spaceships: &Query<&SimPosition, With<Spaceship>>,
) -> Result<Vec2, PathRequestError> {
    match destination {
        PathDestination::Point(point) => Ok(point),
        PathDestination::NearestItem => items.iter()
            .map(|pos| pos.0)
            .min_by(|a, b| a.distance_squared(from).total_cmp(&b.distance_squared(from)))
            .ok_or(PathRequestError::NoDestination(destination)),
        PathDestination::Spaceship => spaceships.iter()
            .next()
            .map(|pos| pos.0)
            .ok_or(PathRequestError::NoDestination(destination)),
    }
}

/// Turn pending [`PathRequest`]s into [`Waypoints`].
///
/// A successful request replaces the requester's queue wholesale. A failed
/// request is logged and leaves any existing queue in place.
pub fn process_path_requests(
    mut path_requests: MessageReader<PathRequest>,
    mut commands: Commands,
    graph: Res<MapGraph>,
    mut pathfinder: ResMut<AStarPathfinder>,
    requesters: Query<&SimPosition>,
    items: Query<&SimPosition, With<Item>>,
    spaceships: Query<&SimPosition, With<Spaceship>>,
) {
    if path_requests.is_empty() {
        return;
    }

    if graph.is_empty() {
        warn!("[PATHFINDING] Map graph not built; dropping {} path requests", path_requests.len());
        path_requests.clear();
        return;
    }

    let start_time = std::time::Instant::now();
    let request_count = path_requests.len();

    for request in path_requests.read() {
        let outcome = requesters.get(request.entity)
            .map_err(|_| PathRequestError::MissingRequester(request.entity))
            .and_then(|from| {
                let to = resolve_destination(request.destination, from.0, &items, &spaceships)?;
                plan_route(&mut pathfinder, &graph, from.0, to)
            });

        match outcome {
            Ok(waypoints) => {
                info!("[PATHFINDING] {:?} -> {:?}: {} waypoints",
                      request.entity, request.destination, waypoints.len());
                commands.entity(request.entity).insert(Waypoints(waypoints));
            }
            Err(e) => {
                info!("[PATHFINDING] Request from {:?} rejected: {}", request.entity, e);
            }
        }
    }

    let total_duration = start_time.elapsed();
    if total_duration.as_millis() > 16 {
        warn!("[PATHFINDING] Slow batch processing: {:?} for {} requests", total_duration, request_count);
    }
}
