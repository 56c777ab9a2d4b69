use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// One named layer of a tile map. `tiles` is row-major, `None` for an empty cell.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TileLayer {
    pub name: String,
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<Option<u32>>,
}

impl TileLayer {
    pub fn new(name: impl Into<String>, width: usize, height: usize) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            tiles: vec![None; width * height],
        }
    }

    pub fn get_index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Tile id at `(x, y)`, `None` for empty or out-of-range cells.
    pub fn tile(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.tiles[self.get_index(x, y)]
    }

    /// Whether a tile occupies `(x, y)`.
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.tile(x, y).is_some()
    }

    pub fn set_tile(&mut self, x: usize, y: usize, tile: Option<u32>) {
        if x < self.width && y < self.height {
            let idx = self.get_index(x, y);
            self.tiles[idx] = tile;
        }
    }

    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, tile: u32) {
        for ty in y..(y + h).min(self.height) {
            for tx in x..(x + w).min(self.width) {
                self.set_tile(tx, ty, Some(tile));
            }
        }
    }
}

/// Tile map as delivered by a loader: geometry metadata plus named layers.
#[derive(Resource, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TileMap {
    pub width: usize,
    pub height: usize,
    pub tile_width: f32,
    pub tile_height: f32,
    pub layers: Vec<TileLayer>,
}

impl TileMap {
    pub fn new(width: usize, height: usize, tile_width: f32, tile_height: f32) -> Self {
        Self {
            width,
            height,
            tile_width,
            tile_height,
            layers: Vec::new(),
        }
    }

    pub fn layer(&self, name: &str) -> Option<&TileLayer> {
        self.layers.iter().find(|layer| layer.name == name)
    }

    /// Returns the named layer, creating an empty one sized to the map if absent.
    pub fn ensure_layer(&mut self, name: &str) -> &mut TileLayer {
        if let Some(idx) = self.layers.iter().position(|layer| layer.name == name) {
            return &mut self.layers[idx];
        }
        self.layers.push(TileLayer::new(name, self.width, self.height));
        let last = self.layers.len() - 1;
        &mut self.layers[last]
    }
}
