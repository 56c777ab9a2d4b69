use bevy::prelude::*;
use crate::game::GameState;
use crate::game::config::{GameConfig, GameConfigHandle};
use crate::game::enemy::{DamageEvent, Enemy, Health};
use crate::game::pathfinding::{PathDestination, PathRequest, Waypoints};
use crate::game::simulation::{SimConfig, SimPosition, SimSet, SimVelocity};

/// Marks the player-controlled character.
#[derive(Component, Debug, Default)]
pub struct Player;

pub struct ControlPlugin;

impl Plugin for ControlPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, move_player.in_set(SimSet::Input))
           .add_systems(Update, (handle_path_keys, handle_attack).run_if(in_state(GameState::InGame)));
    }
}

/// Unit direction for the currently held movement keys, zero when none are held.
pub fn movement_direction(keys: &ButtonInput<KeyCode>, config: &GameConfig) -> Vec2 {
    let mut direction = Vec2::ZERO;
    if keys.pressed(config.key_move_up) {
        direction.y += 1.0;
    }
    if keys.pressed(config.key_move_down) {
        direction.y -= 1.0;
    }
    if keys.pressed(config.key_move_left) {
        direction.x -= 1.0;
    }
    if keys.pressed(config.key_move_right) {
        direction.x += 1.0;
    }
    direction.normalize_or_zero()
}

/// Manual movement. Any movement key abandons the current path; with no keys
/// held the player only stops if it has no path to follow.
fn move_player(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    mut q_player: Query<(Entity, &mut SimVelocity, Has<Waypoints>), With<Player>>,
    sim_config: Res<SimConfig>,
    config_handle: Res<GameConfigHandle>,
    game_configs: Res<Assets<GameConfig>>,
) {
    let Ok((entity, mut velocity, following)) = q_player.single_mut() else { return };
    let Some(config) = game_configs.get(&config_handle.0) else { return };

    let direction = movement_direction(&keys, config);
    if direction != Vec2::ZERO {
        if following {
            debug!("Manual movement cancels path for {:?}", entity);
            commands.entity(entity).remove::<Waypoints>();
        }
        velocity.0 = direction * sim_config.player_speed;
    } else if !following {
        velocity.0 = Vec2::ZERO;
    }
}

/// Request assisted navigation, or drop the current path.
fn handle_path_keys(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    q_player: Query<Entity, With<Player>>,
    mut path_requests: MessageWriter<PathRequest>,
    config_handle: Res<GameConfigHandle>,
    game_configs: Res<Assets<GameConfig>>,
) {
    let Ok(entity) = q_player.single() else { return };
    let Some(config) = game_configs.get(&config_handle.0) else { return };

    let destination = if keys.just_pressed(config.key_path_to_item) {
        Some(PathDestination::NearestItem)
    } else if keys.just_pressed(config.key_path_to_spaceship) {
        Some(PathDestination::Spaceship)
    } else {
        None
    };

    if let Some(destination) = destination {
        info!("Player requested path to {:?}", destination);
        path_requests.write(PathRequest { entity, destination });
    }

    if keys.just_pressed(config.key_cancel_path) {
        info!("Player cancelled path");
        commands.entity(entity).remove::<Waypoints>();
    }
}

/// Melee swing hitting every living enemy within `attack_range`.
fn handle_attack(
    keys: Res<ButtonInput<KeyCode>>,
    q_player: Query<&SimPosition, With<Player>>,
    q_enemies: Query<(Entity, &SimPosition, &Health), With<Enemy>>,
    mut damage: MessageWriter<DamageEvent>,
    sim_config: Res<SimConfig>,
    config_handle: Res<GameConfigHandle>,
    game_configs: Res<Assets<GameConfig>>,
) {
    let Some(config) = game_configs.get(&config_handle.0) else { return };
    if !keys.just_pressed(config.key_attack) {
        return;
    }
    let Ok(player) = q_player.single() else { return };

    let range_sq = sim_config.attack_range * sim_config.attack_range;
    for (entity, pos, health) in q_enemies.iter() {
        if !health.is_dead() && pos.0.distance_squared(player.0) <= range_sq {
            damage.write(DamageEvent { entity, amount: sim_config.attack_damage });
        }
    }
}
