use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub mod camera;
pub mod config;
pub mod control;
pub mod enemy;
pub mod fixed_math;
pub mod items;
pub mod map;
pub mod pathfinding;
pub mod simulation;
mod visuals;

use camera::{GameCamera, GameCameraPlugin};
use config::{GameConfigPlugin, InitialConfig};
use control::{ControlPlugin, Player};
use enemy::{BehaviorState, Enemy, EnemyPlugin, EnemyStrategy, Flying, Health};
use items::{Inventory, Item, ItemsPlugin, Spaceship};
use map::generation::{generate_tile_map, MapGenParams};
use map::{MapGraph, Node};
use pathfinding::{PathFollower, PathfindingPlugin};
use simulation::{SimConfig, SimPosition, SimPositionPrev, SimVelocity, SimulationPlugin};
use visuals::VisualsPlugin;

/// Offsets (in cells) of the extra patrol points around an enemy's spawn.
const PATROL_OFFSETS: [(i64, i64); 2] = [(4, 0), (4, 4)];

#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    #[default]
    Loading,
    InGame,
}

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
           .add_plugins((
               GameConfigPlugin,
               SimulationPlugin,
               PathfindingPlugin,
               EnemyPlugin,
               GameCameraPlugin,
               ControlPlugin,
               ItemsPlugin,
               VisualsPlugin,
           ))
           // Camera is spawned in Startup; enemies need its entity
           .add_systems(PostStartup, setup_world);
    }
}

/// Generate the map, build the navigation grid and populate it.
fn setup_world(
    mut commands: Commands,
    config: Res<InitialConfig>,
    q_camera: Query<Entity, With<GameCamera>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    info!("World setup started");
    let sim_config = SimConfig::from(&*config);

    let params = MapGenParams::new(
        config.map_width,
        config.map_height,
        config.tile_width,
        config.tile_height,
        config.map_seed,
    );
    let tile_map = generate_tile_map(&params, &config.collision_layer);
    let graph = MapGraph::build(&tile_map, &config.collision_layer);

    let mut rng = StdRng::seed_from_u64(config.map_seed.wrapping_add(1));
    let attempts = config.random_node_attempts;

    let Some(player_node) = graph.random_walkable_node(&mut rng, attempts) else {
        error!("No walkable cell for the player after {} attempts; staying in Loading", attempts);
        return;
    };
    let player = commands.spawn((
        Player,
        Inventory::default(),
        PathFollower { speed: sim_config.path_speed },
        agent_bundle(graph.to_world_position(player_node)),
    )).id();

    match graph.random_walkable_node(&mut rng, attempts) {
        Some(node) => {
            commands.spawn((Spaceship, SimPosition(graph.to_world_position(node))));
        }
        None => warn!("No walkable cell for the spaceship"),
    }

    let mut items = 0;
    for _ in 0..config.item_count {
        if let Some(node) = graph.random_walkable_node(&mut rng, attempts) {
            commands.spawn((Item, SimPosition(graph.to_world_position(node))));
            items += 1;
        }
    }

    let camera = q_camera.single().ok();
    if camera.is_none() {
        warn!("No game camera; enemies will only chase");
    }

    let mut enemies = 0;
    for i in 0..config.enemy_count {
        let Some(node) = graph.random_walkable_node(&mut rng, attempts) else { continue };
        let position = graph.to_world_position(node);

        // The last enemy is a flying chaser
        let is_chaser = i + 1 == config.enemy_count || camera.is_none();
        let strategy = match camera {
            Some(camera) if !is_chaser => {
                EnemyStrategy::switching(player, camera, patrol_points(&graph, node), &sim_config)
            }
            _ => EnemyStrategy::chase(player, &sim_config),
        };

        let mut enemy = commands.spawn((
            Enemy,
            Health::new(config.enemy_health),
            BehaviorState::default(),
            strategy,
            agent_bundle(position),
        ));
        if is_chaser {
            enemy.insert(Flying);
        }
        enemies += 1;
    }

    info!("Spawned player at {:?}, {} items, {} enemies", player_node, items, enemies);

    commands.insert_resource(tile_map);
    commands.insert_resource(graph);
    next_state.set(GameState::InGame);
}

fn agent_bundle(position: Vec2) -> (SimPosition, SimPositionPrev, SimVelocity) {
    (SimPosition(position), SimPositionPrev(position), SimVelocity::default())
}

/// Spawn cell followed by walkable cells near each of [`PATROL_OFFSETS`].
fn patrol_points(graph: &MapGraph, origin: Node) -> Vec<Vec2> {
    std::iter::once(origin)
        .chain(PATROL_OFFSETS.iter().map(|&(dx, dy)| graph.nearest_walkable_offset(origin, dx, dy)))
        .map(|node| graph.to_world_position(node))
        .collect()
}
