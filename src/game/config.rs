use bevy::prelude::*;
use bevy_common_assets::ron::RonAssetPlugin;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors raised while reading configuration files.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("invalid value in {path}: {reason}")]
    Invalid { path: String, reason: String },
}

/// Static configuration loaded once at startup. These values define the map
/// geometry, movement speeds, and behavior thresholds; changing them mid-game
/// would invalidate the navigation graph and every queued path.
///
/// All distances are world pixels.
#[derive(Resource, Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct InitialConfig {
    // Simulation
    pub tick_rate: f64,

    // Map
    pub tile_width: f32,
    pub tile_height: f32,
    pub map_width: usize,
    pub map_height: usize,
    pub map_seed: u64,
    pub collision_layer: String,
    pub random_node_attempts: usize,

    // Path following
    pub path_speed: f32,
    pub waypoint_arrival_radius: f32,

    // Enemy behavior
    pub patrol_speed: f32,
    pub patrol_arrival_radius: f32,
    pub chase_speed: f32,
    pub chase_near_distance: f32,
    pub trigger_distance: f32,
    pub hurt_duration: f32,
    pub enemy_health: f32,

    // Player combat
    pub attack_range: f32,
    pub attack_damage: f32,

    // World population
    pub enemy_count: usize,
    pub item_count: usize,
    pub player_speed: f32,
    pub pickup_radius: f32,
}

impl Default for InitialConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            tile_width: 64.0,
            tile_height: 32.0,
            map_width: 40,
            map_height: 40,
            map_seed: 12345,
            collision_layer: "collision".to_string(),
            random_node_attempts: 100,
            path_speed: 100.0,
            waypoint_arrival_radius: 12.0,
            patrol_speed: 60.0,
            patrol_arrival_radius: 4.0,
            chase_speed: 90.0,
            chase_near_distance: 100.0,
            trigger_distance: 400.0,
            hurt_duration: 0.4,
            enemy_health: 3.0,
            attack_range: 48.0,
            attack_damage: 1.0,
            enemy_count: 6,
            item_count: 5,
            player_speed: 120.0,
            pickup_radius: 20.0,
        }
    }
}

impl InitialConfig {
    /// Reads and parses a RON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        let config = Self::from_ron(&contents).map_err(|source| ConfigError::Parse {
            path: display.clone(),
            source,
        })?;
        config
            .validate()
            .map_err(|reason| ConfigError::Invalid { path: display, reason })?;
        Ok(config)
    }

    /// Rejects values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.tick_rate.is_finite() && self.tick_rate > 0.0) {
            return Err(format!("tick_rate must be positive, got {}", self.tick_rate));
        }
        if !(self.tile_width > 0.0 && self.tile_height > 0.0) {
            return Err(format!(
                "tile size must be positive, got {}x{}",
                self.tile_width, self.tile_height
            ));
        }
        Ok(())
    }

    pub fn from_ron(contents: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str::<InitialConfig>(contents)
    }
}

/// Runtime configuration that can be hot-reloaded during gameplay.
/// Only input bindings and camera feel live here; nothing that affects
/// navigation or behavior.
#[derive(Deserialize, Serialize, Asset, TypePath, Clone, Debug)]
pub struct GameConfig {
    pub key_move_up: KeyCode,
    pub key_move_down: KeyCode,
    pub key_move_left: KeyCode,
    pub key_move_right: KeyCode,
    pub key_path_to_item: KeyCode,
    pub key_path_to_spaceship: KeyCode,
    pub key_cancel_path: KeyCode,
    pub key_attack: KeyCode,

    pub camera_zoom_speed: f32,
    pub camera_min_zoom: f32,
    pub camera_max_zoom: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            key_move_up: KeyCode::KeyW,
            key_move_down: KeyCode::KeyS,
            key_move_left: KeyCode::KeyA,
            key_move_right: KeyCode::KeyD,
            key_path_to_item: KeyCode::KeyI,
            key_path_to_spaceship: KeyCode::KeyP,
            key_cancel_path: KeyCode::Escape,
            key_attack: KeyCode::Space,
            camera_zoom_speed: 0.1,
            camera_min_zoom: 0.5,
            camera_max_zoom: 3.0,
        }
    }
}

#[derive(Resource)]
pub struct GameConfigHandle(pub Handle<GameConfig>);

pub struct GameConfigPlugin;

impl Plugin for GameConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RonAssetPlugin::<GameConfig>::new(&["game_config.ron"]))
            .add_systems(PreStartup, (load_initial_config, setup_runtime_config).chain());
    }
}

const INITIAL_CONFIG_PATH: &str = "assets/initial_config.ron";

/// Load static initial configuration synchronously at startup.
/// Runs before any Startup system that builds the map or spawns agents.
fn load_initial_config(mut commands: Commands) {
    match InitialConfig::load(INITIAL_CONFIG_PATH) {
        Ok(config) => {
            info!("Loaded initial config from {}", INITIAL_CONFIG_PATH);
            commands.insert_resource(config);
        }
        Err(e) => {
            error!("{}", e);
            error!("Using default InitialConfig");
            commands.insert_resource(InitialConfig::default());
        }
    }
}

/// Load runtime configuration asynchronously (can be hot-reloaded).
fn setup_runtime_config(mut commands: Commands, asset_server: Res<AssetServer>) {
    let handle = asset_server.load("game_config.ron");
    commands.insert_resource(GameConfigHandle(handle));
}
