/// Sprites for the map and agents.
///
/// Rendering is kept minimal: flat colored quads, with enemy tint standing in
/// for the per-state animation each [`BehaviorState`] would trigger.

use bevy::prelude::*;
use crate::game::GameState;
use crate::game::control::Player;
use crate::game::enemy::{BehaviorState, Enemy};
use crate::game::items::{Item, Spaceship};
use crate::game::map::MapGraph;
use crate::game::simulation::{SimPosition, SimPositionPrev};

const TILE_Z: f32 = 0.0;
const AGENT_Z: f32 = 10.0;

pub struct VisualsPlugin;

impl Plugin for VisualsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::InGame), spawn_tile_sprites)
           .add_systems(Update, (
               spawn_agent_sprites,
               sync_visuals,
               tint_enemies_by_state,
           ).run_if(in_state(GameState::InGame)));
    }
}

#[derive(Component)]
pub struct TileSprite;

fn spawn_tile_sprites(mut commands: Commands, graph: Res<MapGraph>) {
    let size = Vec2::new(graph.tile_width / 2.0, graph.tile_height / 2.0);
    for node in graph.nodes() {
        let color = if node.walkable {
            Color::srgb(0.25, 0.45, 0.25)
        } else {
            Color::srgb(0.35, 0.35, 0.38)
        };
        let pos = graph.to_world_position(*node);
        commands.spawn((
            Sprite::from_color(color, size),
            Transform::from_xyz(pos.x, pos.y, TILE_Z),
            TileSprite,
        ));
    }
    info!("Spawned {} tile sprites", graph.len());
}

/// Attach a sprite to every new agent, item and spaceship.
fn spawn_agent_sprites(
    mut commands: Commands,
    query: Query<
        (Entity, &SimPosition, Has<Player>, Has<Enemy>, Has<Item>, Has<Spaceship>),
        Added<SimPosition>,
    >,
) {
    for (entity, pos, player, enemy, item, spaceship) in query.iter() {
        let (color, size) = if player {
            (Color::srgb(0.2, 0.6, 1.0), Vec2::splat(18.0))
        } else if enemy {
            (state_color(BehaviorState::Idle), Vec2::splat(16.0))
        } else if item {
            (Color::srgb(1.0, 0.85, 0.1), Vec2::splat(10.0))
        } else if spaceship {
            (Color::srgb(0.85, 0.85, 0.95), Vec2::new(28.0, 36.0))
        } else {
            continue;
        };

        commands.entity(entity).insert((
            Sprite::from_color(color, size),
            Transform::from_xyz(pos.0.x, pos.0.y, depth(pos.0)),
        ));
    }
}

/// Agents lower on screen draw on top.
fn depth(pos: Vec2) -> f32 {
    AGENT_Z - pos.y * 0.001
}

/// Synchronizes visual transforms with simulation positions (with interpolation)
fn sync_visuals(
    mut query: Query<(&mut Transform, &SimPosition, Option<&SimPositionPrev>), With<Sprite>>,
    fixed_time: Res<Time<Fixed>>,
) {
    let alpha = fixed_time.overstep_fraction();
    for (mut transform, pos, prev) in query.iter_mut() {
        let p = match prev {
            Some(prev) => prev.0.lerp(pos.0, alpha),
            None => pos.0,
        };
        transform.translation = Vec3::new(p.x, p.y, depth(p));
    }
}

fn state_color(state: BehaviorState) -> Color {
    match state {
        BehaviorState::Idle => Color::srgb(0.8, 0.7, 0.3),
        BehaviorState::Patrol => Color::srgb(0.9, 0.5, 0.1),
        BehaviorState::Chase => Color::srgb(0.9, 0.1, 0.1),
        BehaviorState::Hurt => Color::WHITE,
        BehaviorState::Death => Color::srgb(0.2, 0.2, 0.2),
    }
}

fn tint_enemies_by_state(
    mut query: Query<(&mut Sprite, &BehaviorState), (With<Enemy>, Changed<BehaviorState>)>,
) {
    for (mut sprite, state) in query.iter_mut() {
        sprite.color = state_color(*state);
    }
}
