use bevy::prelude::*;
use crate::game::GameState;
use crate::game::control::Player;
use crate::game::simulation::{SimConfig, SimPosition, SimSet};

/// A collectible lying on the map.
#[derive(Component, Debug, Default)]
pub struct Item;

/// The goal the player navigates toward.
#[derive(Component, Debug, Default)]
pub struct Spaceship;

/// Items picked up so far.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Inventory {
    pub items: u32,
}

#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct ItemCollected {
    pub collector: Entity,
    pub item: Entity,
}

/// Emitted once each time the player enters pickup range of the spaceship.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct GoalReached {
    pub entity: Entity,
    pub items: u32,
}

pub struct ItemsPlugin;

impl Plugin for ItemsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ItemCollected>()
           .add_message::<GoalReached>()
           .add_systems(
               FixedUpdate,
               (collect_items, check_goal)
                   .after(SimSet::Integration)
                   .run_if(in_state(GameState::InGame)),
           );
    }
}

pub fn collect_items(
    mut commands: Commands,
    mut q_player: Query<(Entity, &SimPosition, &mut Inventory), With<Player>>,
    q_items: Query<(Entity, &SimPosition), With<Item>>,
    mut collected: MessageWriter<ItemCollected>,
    sim_config: Res<SimConfig>,
) {
    let radius_sq = sim_config.pickup_radius * sim_config.pickup_radius;

    for (collector, pos, mut inventory) in q_player.iter_mut() {
        let mut remaining = 0;
        for (item, item_pos) in q_items.iter() {
            if item_pos.0.distance_squared(pos.0) > radius_sq {
                remaining += 1;
                continue;
            }
            commands.entity(item).despawn();
            inventory.items += 1;
            collected.write(ItemCollected { collector, item });
            info!("Collected item {:?} ({} total)", item, inventory.items);
        }

        if remaining == 0 && q_items.iter().count() > 0 {
            info!("All items collected, head to the spaceship");
        }
    }
}

pub fn check_goal(
    q_player: Query<(Entity, &SimPosition, &Inventory), With<Player>>,
    q_spaceship: Query<&SimPosition, With<Spaceship>>,
    mut goal: MessageWriter<GoalReached>,
    sim_config: Res<SimConfig>,
    mut at_goal: Local<bool>,
) {
    let Ok((entity, pos, inventory)) = q_player.single() else { return };
    let Some(ship) = q_spaceship.iter().next() else { return };

    let inside = ship.0.distance(pos.0) <= sim_config.pickup_radius;
    if inside && !*at_goal {
        info!("Player reached the spaceship with {} items", inventory.items);
        goal.write(GoalReached { entity, items: inventory.items });
    }
    *at_goal = inside;
}
