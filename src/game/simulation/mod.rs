/// Simulation layer - tick-driven movement.
///
/// This module is organized into:
/// - **components**: Position and velocity
/// - **resources**: Simulation config and tick counter
/// - **physics**: Velocity integration
/// - **systems**: Tick management and config initialization

use bevy::prelude::*;
use crate::game::GameState;

pub mod components;
pub mod resources;
pub mod physics;
pub mod systems;

pub use components::*;
pub use resources::*;

// System sets for organizing execution order
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum SimSet {
    Input,      // Player input and path requests
    Steering,   // Strategies and path following write desired velocity
    Integration // Applying velocity to position
}

/// Main simulation plugin
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(60.0));
        app.init_resource::<SimConfig>();
        app.init_resource::<SimTick>();

        app.configure_sets(FixedUpdate, (
            SimSet::Input,
            SimSet::Steering,
            SimSet::Integration,
        ).chain().run_if(in_state(GameState::InGame)));

        app.add_systems(Startup, systems::init_sim_config_from_initial);

        app.add_systems(FixedUpdate, (
            systems::increment_sim_tick.before(SimSet::Input),
            physics::store_previous_position.before(SimSet::Input),
            physics::apply_velocity.in_set(SimSet::Integration),
        ));
    }
}
