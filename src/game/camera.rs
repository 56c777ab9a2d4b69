use bevy::prelude::*;
use bevy::input::mouse::MouseWheel;
use bevy::window::PrimaryWindow;
use crate::game::GameState;
use crate::game::config::{GameConfig, GameConfigHandle};
use crate::game::control::Player;
use crate::game::enemy::ViewRect;
use crate::game::simulation::SimPosition;

pub struct GameCameraPlugin;

impl Plugin for GameCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
           .add_systems(Update, (
               sync_view_to_window,
               zoom_camera,
               follow_player,
           ).chain().run_if(in_state(GameState::InGame)));
    }
}

#[derive(Component)]
pub struct GameCamera;

/// Viewport of a camera in window pixels. The camera's `Transform`
/// translation is the view center.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub width: f32,
    pub height: f32,
    /// World pixels per screen pixel.
    pub zoom: f32,
}

impl Default for CameraView {
    fn default() -> Self {
        Self { width: 1280.0, height: 720.0, zoom: 1.0 }
    }
}

impl CameraView {
    /// World rectangle this view covers when centered on `center`.
    pub fn view_rect(&self, center: Vec2) -> ViewRect {
        ViewRect::new(center, self.width, self.height, self.zoom)
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Transform::default(),
        CameraView::default(),
        GameCamera,
    ));
}

fn sync_view_to_window(
    q_window: Query<&Window, With<PrimaryWindow>>,
    mut q_camera: Query<(&mut CameraView, &mut Projection), With<GameCamera>>,
) {
    let Ok(window) = q_window.single() else { return };
    let Ok((mut view, mut projection)) = q_camera.single_mut() else { return };

    let (width, height) = (window.width(), window.height());
    if view.width != width || view.height != height {
        view.width = width;
        view.height = height;
    }
    if let Projection::Orthographic(ortho) = &mut *projection {
        if ortho.scale != view.zoom {
            ortho.scale = view.zoom;
        }
    }
}

fn zoom_camera(
    mut q_camera: Query<&mut CameraView, With<GameCamera>>,
    mut scroll_evr: MessageReader<MouseWheel>,
    config_handle: Res<GameConfigHandle>,
    game_configs: Res<Assets<GameConfig>>,
) {
    let Ok(mut view) = q_camera.single_mut() else { return };
    let Some(config) = game_configs.get(&config_handle.0) else { return };

    for ev in scroll_evr.read() {
        let zoom = (view.zoom - ev.y * config.camera_zoom_speed)
            .clamp(config.camera_min_zoom, config.camera_max_zoom);
        view.zoom = zoom;
    }
}

fn follow_player(
    q_player: Query<&SimPosition, With<Player>>,
    mut q_camera: Query<&mut Transform, With<GameCamera>>,
) {
    let Ok(player) = q_player.single() else { return };
    let Ok(mut transform) = q_camera.single_mut() else { return };
    transform.translation.x = player.0.x;
    transform.translation.y = player.0.y;
}
