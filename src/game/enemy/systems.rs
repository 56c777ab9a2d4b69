use bevy::prelude::*;
use crate::game::camera::CameraView;
use crate::game::simulation::{SimPosition, SimTick, SimVelocity};
use crate::profile_log;
use super::components::{BehaviorState, Enemy, Flying, Health};
use super::strategy::{Agent, EnemyStrategy, Perception};

/// Step every enemy's strategy once.
///
/// Target positions and camera viewports are looked up through the entity
/// references each strategy carries. A reference that no longer resolves
/// leaves the corresponding [`Perception`] field empty, which the strategies
/// treat as a no-op for that agent this tick.
pub fn run_enemy_strategies(
    mut enemies: Query<
        (Entity, &SimPosition, &mut SimVelocity, &mut BehaviorState, &mut EnemyStrategy, &Health, Has<Flying>),
        With<Enemy>,
    >,
    positions: Query<&SimPosition>,
    cameras: Query<(&Transform, &CameraView)>,
    #[allow(unused_variables)] tick: Res<SimTick>,
) {
    for (entity, pos, mut vel, mut state, mut strategy, health, flying) in enemies.iter_mut() {
        let perception = Perception {
            target: strategy.target().and_then(|target| match positions.get(target) {
                Ok(p) => Some(p.0),
                Err(_) => {
                    debug!("Enemy {:?}: target {:?} has no position", entity, target);
                    None
                }
            }),
            view: strategy.camera().and_then(|camera| match cameras.get(camera) {
                Ok((transform, view)) => Some(view.view_rect(transform.translation.truncate())),
                Err(_) => {
                    debug!("Enemy {:?}: camera {:?} has no view", entity, camera);
                    None
                }
            }),
        };

        let mut agent = Agent {
            position: pos.0,
            velocity: &mut vel.0,
            state: &mut *state,
            dead: health.is_dead(),
            flying,
        };
        strategy.update(&mut agent, &perception);
    }

    profile_log!(tick, "[ENEMY] Stepped {} strategies", enemies.iter().count());
}
