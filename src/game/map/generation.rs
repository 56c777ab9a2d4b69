/// Seeded procedural tile maps.
///
/// Produces a [`TileMap`] with a ground layer and a collision layer holding a
/// solid border plus scattered rectangular obstacles. The same seed always
/// yields the same map.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::tile_map::TileMap;

/// Tile id used for generated walls.
pub const WALL_TILE: u32 = 1;
/// Tile id used for the ground layer.
pub const GROUND_TILE: u32 = 0;

#[derive(Debug, Clone, Copy)]
pub struct MapGenParams {
    pub width: usize,
    pub height: usize,
    pub tile_width: f32,
    pub tile_height: f32,
    pub seed: u64,
    /// Number of rectangular obstacles to scatter.
    pub obstacle_count: usize,
    /// Largest obstacle edge, in cells.
    pub max_obstacle_size: usize,
}

impl MapGenParams {
    pub fn new(width: usize, height: usize, tile_width: f32, tile_height: f32, seed: u64) -> Self {
        Self {
            width,
            height,
            tile_width,
            tile_height,
            seed,
            obstacle_count: (width * height) / 60,
            max_obstacle_size: 3,
        }
    }
}

/// Generate a map whose blocked cells live on `collision_layer`.
pub fn generate_tile_map(params: &MapGenParams, collision_layer: &str) -> TileMap {
    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut map = TileMap::new(params.width, params.height, params.tile_width, params.tile_height);

    let ground = map.ensure_layer("ground");
    ground.tiles.fill(Some(GROUND_TILE));

    let walls = map.ensure_layer(collision_layer);
    if params.width == 0 || params.height == 0 {
        return map;
    }

    // Border
    walls.fill_rect(0, 0, params.width, 1, WALL_TILE);
    walls.fill_rect(0, params.height - 1, params.width, 1, WALL_TILE);
    walls.fill_rect(0, 0, 1, params.height, WALL_TILE);
    walls.fill_rect(params.width - 1, 0, 1, params.height, WALL_TILE);

    // Interior obstacles, kept off the border ring so the edge stays walkable
    if params.width > 4 && params.height > 4 && params.max_obstacle_size > 0 {
        for _ in 0..params.obstacle_count {
            let w = rng.random_range(1..=params.max_obstacle_size);
            let h = rng.random_range(1..=params.max_obstacle_size);
            let x = rng.random_range(2..params.width - 2);
            let y = rng.random_range(2..params.height - 2);
            walls.fill_rect(x, y, w.min(params.width - 2 - x), h.min(params.height - 2 - y), WALL_TILE);
        }
    }

    info!("Generated {}x{} map with {} obstacles (seed {})",
          params.width, params.height, params.obstacle_count, params.seed);
    map
}
