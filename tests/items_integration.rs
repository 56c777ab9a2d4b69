use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use starfall::game::GameState;
use starfall::game::control::Player;
use starfall::game::items::{
    check_goal, collect_items, GoalReached, Inventory, Item, ItemCollected, ItemsPlugin, Spaceship,
};
use starfall::game::simulation::{SimConfig, SimPosition, SimVelocity, SimulationPlugin};

#[derive(Resource, Default)]
struct Collected(Vec<ItemCollected>);

#[derive(Resource, Default)]
struct Goals(Vec<GoalReached>);

fn record_collected(mut messages: MessageReader<ItemCollected>, mut log: ResMut<Collected>) {
    log.0.extend(messages.read().copied());
}

fn record_goals(mut messages: MessageReader<GoalReached>, mut log: ResMut<Goals>) {
    log.0.extend(messages.read().copied());
}

fn setup_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);
    app.add_plugins(SimulationPlugin);
    app.add_plugins(ItemsPlugin);
    app.init_state::<GameState>();
    app.init_resource::<Collected>();
    app.init_resource::<Goals>();
    app.add_systems(FixedUpdate, (
        record_collected.after(collect_items),
        record_goals.after(check_goal),
    ));
    app.world_mut().resource_mut::<NextState<GameState>>().set(GameState::InGame);
    app.update();
    app
}

fn spawn_player(app: &mut App, at: Vec2) -> Entity {
    app.world_mut().spawn((
        Player,
        Inventory::default(),
        SimPosition(at),
        SimVelocity::default(),
    )).id()
}

fn tick(app: &mut App) {
    app.world_mut().run_schedule(FixedUpdate);
}

fn move_player(app: &mut App, player: Entity, to: Vec2) {
    app.world_mut().get_mut::<SimPosition>(player).unwrap().0 = to;
}

#[test]
fn test_items_in_range_are_collected() {
    let mut app = setup_app();
    let radius = app.world().resource::<SimConfig>().pickup_radius;
    let player = spawn_player(&mut app, Vec2::ZERO);
    let near = app.world_mut().spawn((Item, SimPosition(Vec2::new(radius * 0.5, 0.0)))).id();
    let far = app.world_mut().spawn((Item, SimPosition(Vec2::new(radius * 10.0, 0.0)))).id();

    tick(&mut app);

    assert!(app.world().get_entity(near).is_err(), "collected item should be despawned");
    assert!(app.world().get_entity(far).is_ok());
    assert_eq!(app.world().get::<Inventory>(player).unwrap().items, 1);
    assert_eq!(app.world().resource::<Collected>().0, vec![ItemCollected { collector: player, item: near }]);

    // Walk over the second one
    move_player(&mut app, player, Vec2::new(radius * 10.0, 0.0));
    tick(&mut app);
    tick(&mut app);

    assert!(app.world().get_entity(far).is_err());
    assert_eq!(app.world().get::<Inventory>(player).unwrap().items, 2);
    assert_eq!(app.world().resource::<Collected>().0.len(), 2);
}

#[test]
fn test_goal_reached_once_per_entry() {
    let mut app = setup_app();
    let radius = app.world().resource::<SimConfig>().pickup_radius;
    app.world_mut().spawn((Spaceship, SimPosition(Vec2::ZERO)));
    let player = spawn_player(&mut app, Vec2::new(radius * 0.5, 0.0));
    app.world_mut().get_mut::<Inventory>(player).unwrap().items = 3;

    for _ in 0..5 {
        tick(&mut app);
    }
    assert_eq!(app.world().resource::<Goals>().0, vec![GoalReached { entity: player, items: 3 }]);

    move_player(&mut app, player, Vec2::new(radius * 20.0, 0.0));
    tick(&mut app);
    assert_eq!(app.world().resource::<Goals>().0.len(), 1);

    move_player(&mut app, player, Vec2::ZERO);
    tick(&mut app);
    tick(&mut app);
    assert_eq!(app.world().resource::<Goals>().0.len(), 2, "re-entering range reports again");
}

#[test]
fn test_goal_without_spaceship_is_silent() {
    let mut app = setup_app();
    spawn_player(&mut app, Vec2::ZERO);

    for _ in 0..3 {
        tick(&mut app);
    }

    assert!(app.world().resource::<Goals>().0.is_empty());
}
