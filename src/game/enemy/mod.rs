mod components;
mod damage;
mod strategy;
mod systems;


use bevy::prelude::*;
use crate::game::pathfinding::follow_path;
use crate::game::simulation::SimSet;

// Re-export public types
pub use components::{BehaviorState, Enemy, Flying, Health, HurtTimer};
pub use damage::{apply_damage, recover_from_hurt, DamageEvent};
pub use strategy::{
    ActiveDelegate, Agent, ChaseStrategy, EnemyStrategy, PatrolStrategy, Perception,
    SwitchingStrategy, ViewRect,
};
pub use systems::run_enemy_strategies;

/// Plugin that drives enemy strategies and resolves damage.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<DamageEvent>()
           .add_systems(FixedUpdate, (apply_damage, recover_from_hurt).chain().in_set(SimSet::Input))
           // Strategy velocity overrides path following
           .add_systems(FixedUpdate, run_enemy_strategies.in_set(SimSet::Steering).after(follow_path));
    }
}
