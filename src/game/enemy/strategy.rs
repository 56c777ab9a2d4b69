/// Enemy movement strategies.
///
/// All three strategies share one contract: [`EnemyStrategy::update`] writes a
/// desired velocity and behavior state for a single agent, and
/// [`EnemyStrategy::direction`] reports the heading chosen on the last update.
/// The strategies never touch the ECS directly; the system in systems.rs
/// gathers an [`Agent`] view and a [`Perception`] for each enemy and hands
/// them in.

use bevy::prelude::*;
use crate::game::simulation::SimConfig;
use super::components::BehaviorState;

/// Mutable view of one agent for the duration of a strategy update.
#[derive(Debug)]
pub struct Agent<'a> {
    pub position: Vec2,
    pub velocity: &'a mut Vec2,
    pub state: &'a mut BehaviorState,
    pub dead: bool,
    pub flying: bool,
}

impl Agent<'_> {
    /// Set the behavior state unless the agent is hurt or dying.
    fn set_state(&mut self, state: BehaviorState) {
        if self.state.is_overridable() {
            *self.state = state;
        }
    }

    fn halt(&mut self) {
        *self.velocity = Vec2::ZERO;
    }
}

/// Axis-aligned world rectangle covered by a camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewRect {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl ViewRect {
    /// Viewport of `width` x `height` pixels at `zoom`, centered on `center`.
    /// A zoom above 1 shows more of the world.
    pub fn new(center: Vec2, width: f32, height: f32, zoom: f32) -> Self {
        Self {
            center,
            half_extents: Vec2::new(width * zoom / 2.0, height * zoom / 2.0),
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let offset = (point - self.center).abs();
        offset.x <= self.half_extents.x && offset.y <= self.half_extents.y
    }
}

/// What an agent can sense this tick. `None` means the referenced entity (or
/// one of its components) is missing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Perception {
    pub target: Option<Vec2>,
    pub view: Option<ViewRect>,
}

// ============================================================================
// Patrol
// ============================================================================

/// Walks a fixed loop of patrol points.
#[derive(Debug, Clone, PartialEq)]
pub struct PatrolStrategy {
    points: Vec<Vec2>,
    current: usize,
    pub speed: f32,
    pub arrival_radius: f32,
    direction: Vec2,
}

impl PatrolStrategy {
    pub fn new(points: Vec<Vec2>, speed: f32, arrival_radius: f32) -> Self {
        if points.is_empty() {
            warn!("Patrol strategy created with no patrol points; the agent will stand still");
        }
        Self {
            points,
            current: 0,
            speed,
            arrival_radius,
            direction: Vec2::ZERO,
        }
    }

    /// Index of the patrol point currently being walked to.
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn update(&mut self, agent: &mut Agent) {
        if agent.dead {
            return;
        }
        let Some(&goal) = self.points.get(self.current) else {
            return;
        };

        let delta = goal - agent.position;
        if delta.length() < self.arrival_radius {
            agent.halt();
            self.direction = Vec2::ZERO;
            self.current = (self.current + 1) % self.points.len();
        } else {
            self.direction = delta.normalize_or_zero();
            *agent.velocity = self.direction * self.speed;
        }

        agent.set_state(BehaviorState::Patrol);
    }
}

// ============================================================================
// Chase
// ============================================================================

/// Runs straight at a target entity until within `near_distance` of it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChaseStrategy {
    pub target: Entity,
    pub speed: f32,
    pub near_distance: f32,
    direction: Vec2,
}

impl ChaseStrategy {
    pub fn new(target: Entity, speed: f32, near_distance: f32) -> Self {
        Self {
            target,
            speed,
            near_distance,
            direction: Vec2::ZERO,
        }
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn update(&mut self, agent: &mut Agent, target: Option<Vec2>) {
        if agent.dead {
            return;
        }
        let Some(target) = target else {
            return;
        };

        let delta = target - agent.position;
        if delta.length() < self.near_distance {
            agent.halt();
            self.direction = Vec2::ZERO;
            let stance = if agent.flying { BehaviorState::Chase } else { BehaviorState::Patrol };
            agent.set_state(stance);
        } else {
            self.direction = delta.normalize_or_zero();
            *agent.velocity = self.direction * self.speed;
            agent.set_state(BehaviorState::Chase);
        }
    }
}

// ============================================================================
// Switching
// ============================================================================

/// Which delegate a [`SwitchingStrategy`] is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveDelegate {
    #[default]
    Patrol,
    Chase,
}

/// Chases the target while it is on screen and within `trigger_distance`,
/// patrols otherwise. Re-evaluated every tick with no hysteresis, except that
/// the choice is frozen once the agent enters [`BehaviorState::Death`].
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchingStrategy {
    pub camera: Entity,
    pub trigger_distance: f32,
    pub patrol: PatrolStrategy,
    pub chase: ChaseStrategy,
    active: ActiveDelegate,
}

impl SwitchingStrategy {
    pub fn new(camera: Entity, trigger_distance: f32, patrol: PatrolStrategy, chase: ChaseStrategy) -> Self {
        Self {
            camera,
            trigger_distance,
            patrol,
            chase,
            active: ActiveDelegate::Patrol,
        }
    }

    pub fn target(&self) -> Entity {
        self.chase.target
    }

    pub fn active(&self) -> ActiveDelegate {
        self.active
    }

    pub fn direction(&self) -> Vec2 {
        match self.active {
            ActiveDelegate::Patrol => self.patrol.direction(),
            ActiveDelegate::Chase => self.chase.direction(),
        }
    }

    /// The delegate that should run for an agent at `position`.
    pub fn choose(&self, position: Vec2, target: Vec2, view: &ViewRect) -> ActiveDelegate {
        let visible = view.contains(target);
        if visible && position.distance(target) <= self.trigger_distance {
            ActiveDelegate::Chase
        } else {
            ActiveDelegate::Patrol
        }
    }

    pub fn update(&mut self, agent: &mut Agent, perception: &Perception) {
        if agent.dead {
            return;
        }
        let (Some(target), Some(view)) = (perception.target, perception.view) else {
            return;
        };

        if *agent.state != BehaviorState::Death {
            let next = self.choose(agent.position, target, &view);
            if next != self.active {
                debug!("Switching strategy {:?} -> {:?}", self.active, next);
            }
            self.active = next;
        }

        match self.active {
            ActiveDelegate::Patrol => self.patrol.update(agent),
            ActiveDelegate::Chase => self.chase.update(agent, Some(target)),
        }
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Strategy attached to an enemy. The variant stays fixed for the agent's
/// lifetime; only a `Switching` strategy changes its delegate.
#[derive(Component, Debug, Clone, PartialEq)]
pub enum EnemyStrategy {
    Patrol(PatrolStrategy),
    Chase(ChaseStrategy),
    Switching(SwitchingStrategy),
}

impl EnemyStrategy {
    /// Patrol `points` until `target` shows up on `camera` within trigger range.
    pub fn switching(target: Entity, camera: Entity, points: Vec<Vec2>, config: &SimConfig) -> Self {
        EnemyStrategy::Switching(SwitchingStrategy::new(
            camera,
            config.trigger_distance,
            PatrolStrategy::new(points, config.patrol_speed, config.patrol_arrival_radius),
            ChaseStrategy::new(target, config.chase_speed, config.chase_near_distance),
        ))
    }

    /// Chase `target` unconditionally.
    pub fn chase(target: Entity, config: &SimConfig) -> Self {
        EnemyStrategy::Chase(ChaseStrategy::new(target, config.chase_speed, config.chase_near_distance))
    }

    pub fn update(&mut self, agent: &mut Agent, perception: &Perception) {
        match self {
            EnemyStrategy::Patrol(patrol) => patrol.update(agent),
            EnemyStrategy::Chase(chase) => chase.update(agent, perception.target),
            EnemyStrategy::Switching(switching) => switching.update(agent, perception),
        }
    }

    /// Heading chosen on the last update, zero while halted.
    pub fn direction(&self) -> Vec2 {
        match self {
            EnemyStrategy::Patrol(patrol) => patrol.direction(),
            EnemyStrategy::Chase(chase) => chase.direction(),
            EnemyStrategy::Switching(switching) => switching.direction(),
        }
    }

    /// Entity whose position feeds [`Perception::target`].
    pub fn target(&self) -> Option<Entity> {
        match self {
            EnemyStrategy::Patrol(_) => None,
            EnemyStrategy::Chase(chase) => Some(chase.target),
            EnemyStrategy::Switching(switching) => Some(switching.target()),
        }
    }

    /// Camera whose viewport feeds [`Perception::view`].
    pub fn camera(&self) -> Option<Entity> {
        match self {
            EnemyStrategy::Switching(switching) => Some(switching.camera),
            EnemyStrategy::Patrol(_) | EnemyStrategy::Chase(_) => None,
        }
    }
}
