mod astar;
mod components;
mod navigation;
mod systems;
mod types;


// ============================================================================
// PUBLIC API
// ============================================================================

pub use astar::{find_path, AStarPathfinder, NodeCosts, SearchScratch};
pub use components::{PathFollower, Waypoints};
pub use navigation::{cleanup_completed_paths, follow_path, step_waypoints, FollowStep};
pub use systems::{plan_route, process_path_requests, resolve_destination};
pub use types::{PathDestination, PathRequest, PathRequestError, WaypointReached};

use bevy::prelude::*;
use bevy::time::common_conditions::on_timer;
use crate::game::GameState;
use crate::game::map::MapGraph;
use crate::game::simulation::SimSet;

pub struct PathfindingPlugin;

impl Plugin for PathfindingPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<PathRequest>();
        app.add_message::<WaypointReached>();
        app.init_resource::<MapGraph>();
        app.init_resource::<AStarPathfinder>();
        app.add_systems(FixedUpdate, process_path_requests.in_set(SimSet::Input));
        app.add_systems(FixedUpdate, follow_path.in_set(SimSet::Steering));

        // Sweep drained queues
        app.add_systems(
            FixedUpdate,
            cleanup_completed_paths
                .run_if(in_state(GameState::InGame))
                .run_if(on_timer(std::time::Duration::from_secs(2)))
        );
    }
}
