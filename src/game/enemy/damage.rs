use bevy::prelude::*;
use crate::game::simulation::{SimConfig, SimVelocity};
use super::components::{BehaviorState, Health, HurtTimer};

/// Deal `amount` damage to `entity`.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct DamageEvent {
    pub entity: Entity,
    pub amount: f32,
}

/// Apply pending [`DamageEvent`]s.
///
/// A non-fatal hit puts the agent into HURT for `hurt_duration` seconds. A
/// fatal hit sets DEATH and stops the agent; dead agents ignore further
/// damage.
pub fn apply_damage(
    mut commands: Commands,
    mut events: MessageReader<DamageEvent>,
    mut query: Query<(&mut Health, &mut BehaviorState, Option<&mut SimVelocity>)>,
    sim_config: Res<SimConfig>,
) {
    for event in events.read() {
        let Ok((mut health, mut state, velocity)) = query.get_mut(event.entity) else {
            debug!("Damage for {:?} dropped: no Health", event.entity);
            continue;
        };
        if health.is_dead() {
            continue;
        }

        if health.take_damage(event.amount) {
            info!("{:?} died", event.entity);
            *state = BehaviorState::Death;
            if let Some(mut velocity) = velocity {
                velocity.0 = Vec2::ZERO;
            }
            commands.entity(event.entity).remove::<HurtTimer>();
        } else {
            debug!("{:?} hurt for {} ({}/{} left)", event.entity, event.amount, health.current, health.max);
            *state = BehaviorState::Hurt;
            commands.entity(event.entity).insert(HurtTimer::new(sim_config.hurt_duration));
        }
    }
}

/// Return hurt agents to IDLE once their [`HurtTimer`] runs out. The next
/// strategy update picks the real stance.
pub fn recover_from_hurt(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut HurtTimer, &mut BehaviorState, &Health)>,
) {
    for (entity, mut timer, mut state, health) in query.iter_mut() {
        timer.0.tick(time.delta());
        if !timer.0.just_finished() {
            continue;
        }

        commands.entity(entity).remove::<HurtTimer>();
        if *state == BehaviorState::Hurt && !health.is_dead() {
            *state = BehaviorState::Idle;
        }
    }
}
