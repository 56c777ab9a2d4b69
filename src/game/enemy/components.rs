use bevy::prelude::*;

/// Marks an entity as an enemy driven by an [`EnemyStrategy`](super::EnemyStrategy).
#[derive(Component, Debug, Default)]
pub struct Enemy;

/// Marks enemies that hover instead of walking.
///
/// A flying chaser keeps its CHASE stance when it closes in on its target;
/// ground chasers fall back to PATROL.
#[derive(Component, Debug, Default)]
pub struct Flying;

/// Hit points for any damageable agent.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    /// Subtract `amount`, clamping at zero. Returns `true` if this hit was fatal.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.is_dead() {
            return false;
        }
        self.current = (self.current - amount).max(0.0);
        self.is_dead()
    }
}

/// What an agent is currently doing, used to pick animations and sounds.
///
/// `Hurt` takes precedence over anything a strategy wants to set, and `Death`
/// is final.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BehaviorState {
    #[default]
    Idle,
    Patrol,
    Chase,
    Hurt,
    Death,
}

impl BehaviorState {
    /// Whether a strategy may replace this state.
    pub fn is_overridable(self) -> bool {
        !matches!(self, BehaviorState::Hurt | BehaviorState::Death)
    }
}

/// Counts down the HURT stance after a non-fatal hit.
#[derive(Component, Debug)]
pub struct HurtTimer(pub Timer);

impl HurtTimer {
    pub fn new(seconds: f32) -> Self {
        Self(Timer::from_seconds(seconds, TimerMode::Once))
    }
}
