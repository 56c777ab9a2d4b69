use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use std::time::Duration;
use starfall::game::GameState;
use starfall::game::camera::CameraView;
use starfall::game::enemy::{
    ActiveDelegate, BehaviorState, DamageEvent, Enemy, EnemyPlugin, EnemyStrategy, Flying, Health,
    HurtTimer,
};
use starfall::game::pathfinding::PathfindingPlugin;
use starfall::game::simulation::{SimConfig, SimPosition, SimVelocity, SimulationPlugin};

struct Scene {
    app: App,
    camera: Entity,
    player: Entity,
}

fn setup_scene(player_at: Vec2) -> Scene {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);
    app.add_plugins(SimulationPlugin);
    app.add_plugins(PathfindingPlugin);
    app.add_plugins(EnemyPlugin);
    app.init_state::<GameState>();
    app.world_mut().resource_mut::<NextState<GameState>>().set(GameState::InGame);
    app.update();

    let camera = app.world_mut().spawn((
        Transform::default(),
        CameraView { width: 800.0, height: 600.0, zoom: 1.0 },
    )).id();
    let player = app.world_mut().spawn((SimPosition(player_at), SimVelocity::default())).id();

    Scene { app, camera, player }
}

impl Scene {
    fn spawn_switching_enemy(&mut self, at: Vec2) -> Entity {
        let config = self.app.world().resource::<SimConfig>().clone();
        let strategy = EnemyStrategy::switching(
            self.player,
            self.camera,
            vec![at + Vec2::new(-50.0, 0.0), at + Vec2::new(50.0, 0.0)],
            &config,
        );
        self.app.world_mut().spawn((
            Enemy,
            Health::new(3.0),
            BehaviorState::default(),
            strategy,
            SimPosition(at),
            SimVelocity::default(),
        )).id()
    }

    /// One fixed tick with a real time step so hurt timers advance.
    fn tick(&mut self) {
        self.app.world_mut().resource_mut::<Time>().advance_by(Duration::from_secs_f64(1.0 / 60.0));
        self.app.world_mut().run_schedule(FixedUpdate);
    }

    fn state(&self, entity: Entity) -> BehaviorState {
        *self.app.world().get::<BehaviorState>(entity).unwrap()
    }

    fn velocity(&self, entity: Entity) -> Vec2 {
        self.app.world().get::<SimVelocity>(entity).unwrap().0
    }

    fn position(&self, entity: Entity) -> Vec2 {
        self.app.world().get::<SimPosition>(entity).unwrap().0
    }

    fn active(&self, entity: Entity) -> ActiveDelegate {
        match self.app.world().get::<EnemyStrategy>(entity).unwrap() {
            EnemyStrategy::Switching(switching) => switching.active(),
            other => panic!("not a switching strategy: {:?}", other),
        }
    }

    fn move_camera(&mut self, center: Vec2) {
        self.app.world_mut().get_mut::<Transform>(self.camera).unwrap().translation = center.extend(0.0);
    }
}

#[test]
fn test_enemy_chases_visible_player_and_patrols_otherwise() {
    let mut scene = setup_scene(Vec2::new(300.0, 0.0));
    let enemy = scene.spawn_switching_enemy(Vec2::ZERO);

    scene.tick();
    assert_eq!(scene.active(enemy), ActiveDelegate::Chase);
    assert_eq!(scene.state(enemy), BehaviorState::Chase);
    let chase_speed = scene.app.world().resource::<SimConfig>().chase_speed;
    assert!((scene.velocity(enemy) - Vec2::new(chase_speed, 0.0)).length() < 1e-4);
    assert!(scene.position(enemy).x > 0.0, "integration should move the enemy");

    // Player leaves the screen
    scene.move_camera(Vec2::new(3000.0, 0.0));
    scene.tick();
    assert_eq!(scene.active(enemy), ActiveDelegate::Patrol);
    assert_eq!(scene.state(enemy), BehaviorState::Patrol);

    // Back on screen
    scene.move_camera(Vec2::ZERO);
    scene.tick();
    assert_eq!(scene.active(enemy), ActiveDelegate::Chase);
}

#[test]
fn test_hurt_then_recover() {
    let mut scene = setup_scene(Vec2::new(300.0, 0.0));
    let enemy = scene.spawn_switching_enemy(Vec2::ZERO);
    scene.tick();

    scene.app.world_mut().write_message(DamageEvent { entity: enemy, amount: 1.0 });
    scene.tick();

    assert_eq!(scene.state(enemy), BehaviorState::Hurt);
    assert!(scene.app.world().get::<HurtTimer>(enemy).is_some());
    assert_eq!(scene.app.world().get::<Health>(enemy).unwrap().current, 2.0);
    assert_ne!(scene.velocity(enemy), Vec2::ZERO, "hurt enemies keep steering");

    let hurt_ticks = (scene.app.world().resource::<SimConfig>().hurt_duration * 60.0).ceil() as usize;
    for _ in 0..hurt_ticks + 2 {
        scene.tick();
    }

    assert!(scene.app.world().get::<HurtTimer>(enemy).is_none());
    assert_eq!(scene.state(enemy), BehaviorState::Chase);
}

#[test]
fn test_dead_enemy_stops_and_stays_dead() {
    let mut scene = setup_scene(Vec2::new(300.0, 0.0));
    let enemy = scene.spawn_switching_enemy(Vec2::ZERO);
    scene.tick();

    scene.app.world_mut().write_message(DamageEvent { entity: enemy, amount: 10.0 });
    scene.tick();

    assert_eq!(scene.state(enemy), BehaviorState::Death);
    assert_eq!(scene.velocity(enemy), Vec2::ZERO);
    let resting = scene.position(enemy);

    // Player wanders off screen and back; the corpse never reacts
    scene.move_camera(Vec2::new(3000.0, 0.0));
    for _ in 0..30 {
        scene.tick();
    }
    scene.move_camera(Vec2::ZERO);
    scene.tick();

    assert_eq!(scene.state(enemy), BehaviorState::Death);
    assert_eq!(scene.position(enemy), resting);
    assert_eq!(scene.velocity(enemy), Vec2::ZERO);
}

#[test]
fn test_missing_target_is_a_noop() {
    let mut scene = setup_scene(Vec2::new(300.0, 0.0));
    let enemy = scene.spawn_switching_enemy(Vec2::ZERO);
    let player = scene.player;
    scene.app.world_mut().despawn(player);

    for _ in 0..10 {
        scene.tick();
    }

    assert_eq!(scene.state(enemy), BehaviorState::Idle);
    assert_eq!(scene.position(enemy), Vec2::ZERO);
}

#[test]
fn test_flying_chaser_hovers_in_chase_stance() {
    let mut scene = setup_scene(Vec2::new(0.0, 60.0));
    let config = scene.app.world().resource::<SimConfig>().clone();
    let flyer = scene.app.world_mut().spawn((
        Enemy,
        Flying,
        Health::new(3.0),
        BehaviorState::default(),
        EnemyStrategy::chase(scene.player, &config),
        SimPosition(Vec2::ZERO),
        SimVelocity::default(),
    )).id();

    scene.tick();

    assert_eq!(scene.state(flyer), BehaviorState::Chase);
    assert_eq!(scene.velocity(flyer), Vec2::ZERO);
}
