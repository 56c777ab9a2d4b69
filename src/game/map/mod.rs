/// Tile maps and the navigation grid built from them.
///
/// - **tile_map**: layered tile data as handed over by a map loader
/// - **generation**: seeded procedural maps
/// - **graph**: the walkable grid plus isometric world/grid conversion

mod graph;
mod tile_map;
pub mod generation;

#[cfg(test)]
mod tests;

pub use graph::{MapGraph, Node};
pub use tile_map::{TileLayer, TileMap};
