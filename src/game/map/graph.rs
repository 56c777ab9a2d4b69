use bevy::prelude::*;
use rand::Rng;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use super::tile_map::TileMap;

/// Half-width of the square searched by [`MapGraph::nearest_walkable_offset`].
const NEAREST_SEARCH_RADIUS: i64 = 2;

/// One cell of the navigation grid.
///
/// Identity is the `(x, y)` pair: two `Node` values for the same cell compare
/// equal regardless of how they were obtained. Search bookkeeping (costs and
/// parent links) is kept out of the node entirely; see
/// [`SearchScratch`](crate::game::pathfinding::SearchScratch).
#[derive(Clone, Copy, Debug)]
pub struct Node {
    pub x: usize,
    pub y: usize,
    pub walkable: bool,
}

impl Node {
    pub fn new(x: usize, y: usize, walkable: bool) -> Self {
        Self { x, y, walkable }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.hash(state);
        self.y.hash(state);
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

/// Navigation grid built from a tile map's collision layer.
///
/// Owns one [`Node`] per cell and the isometric geometry needed to move
/// between grid cells and world pixels. Built once per map and read-only
/// afterward.
///
/// # Coordinate mapping
///
/// A cell `(x, y)` is first rotated (`rx = y`, `ry = width - 1 - x`) and then
/// projected with half-tile steps:
///
/// ```text
/// world.x = origin.x + (rx + ry) * tile_width / 2 + tile_width / 2
/// world.y = origin.y + (ry - rx) * tile_height / 2
/// ```
///
/// [`MapGraph::node_at_world_position`] inverts this exactly, rounding to the
/// nearest cell, so `node_at_world_position(to_world_position(n)) == Some(n)`
/// for every walkable node.
#[derive(Resource, Clone, Debug, Default)]
pub struct MapGraph {
    pub width: usize,
    pub height: usize,
    pub tile_width: f32,
    pub tile_height: f32,
    /// World offset applied after projection. Chosen so every cell center has
    /// a non-negative world y.
    pub origin: Vec2,
    nodes: Vec<Node>,
}

impl MapGraph {
    /// Build the grid from `map`, marking a cell blocked iff `collision_layer`
    /// has a tile there. A missing layer leaves every cell walkable.
    pub fn build(map: &TileMap, collision_layer: &str) -> Self {
        let layer = map.layer(collision_layer);
        if layer.is_none() {
            warn!("Collision layer '{}' not found; every cell is walkable", collision_layer);
        }

        let graph = Self::from_fn(map.width, map.height, map.tile_width, map.tile_height, |x, y| {
            layer.map_or(true, |l| !l.is_occupied(x, y))
        });

        info!("[MAP GRAPH] Built {}x{} grid, {} walkable cells",
              graph.width, graph.height, graph.walkable_count());
        graph
    }

    /// Build a grid whose walkability is given by `walkable(x, y)`.
    pub fn from_fn(
        width: usize,
        height: usize,
        tile_width: f32,
        tile_height: f32,
        walkable: impl Fn(usize, usize) -> bool,
    ) -> Self {
        let mut nodes = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                nodes.push(Node::new(x, y, walkable(x, y)));
            }
        }

        let half_height = tile_height / 2.0;
        let origin = Vec2::new(0.0, height.saturating_sub(1) as f32 * half_height);

        Self {
            width,
            height,
            tile_width,
            tile_height,
            origin,
            nodes,
        }
    }

    /// Zero-sized grid used before a map is loaded.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get_index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn node(&self, x: usize, y: usize) -> Option<Node> {
        if x < self.width && y < self.height {
            Some(self.nodes[self.get_index(x, y)])
        } else {
            None
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_walkable(&self, x: usize, y: usize) -> bool {
        self.node(x, y).is_some_and(|n| n.walkable)
    }

    pub fn walkable_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.walkable).count()
    }

    /// The up-to-8 in-bounds neighbors of `node`, walkable or not.
    pub fn neighbors(&self, node: Node) -> SmallVec<[Node; 8]> {
        let mut out = SmallVec::new();
        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = node.x as i64 + dx;
                let ny = node.y as i64 + dy;
                if self.in_bounds(nx, ny) {
                    out.push(self.nodes[self.get_index(nx as usize, ny as usize)]);
                }
            }
        }
        out
    }

    /// World-pixel center of `node`.
    pub fn to_world_position(&self, node: Node) -> Vec2 {
        let half_w = self.tile_width / 2.0;
        let half_h = self.tile_height / 2.0;
        let rotated_x = node.y as f32;
        let rotated_y = (self.width as f32 - 1.0) - node.x as f32;

        Vec2::new(
            self.origin.x + (rotated_x + rotated_y) * half_w + half_w,
            self.origin.y + (rotated_y - rotated_x) * half_h,
        )
    }

    /// Grid cell containing `world_pos`, ignoring walkability.
    pub fn world_to_grid(&self, world_pos: Vec2) -> Option<(usize, usize)> {
        let half_w = self.tile_width / 2.0;
        let half_h = self.tile_height / 2.0;
        if half_w <= 0.0 || half_h <= 0.0 {
            return None;
        }

        let sum = (world_pos.x - self.origin.x - half_w) / half_w;
        let diff = (world_pos.y - self.origin.y) / half_h;
        let rotated_x = ((sum - diff) / 2.0).round();
        let rotated_y = ((sum + diff) / 2.0).round();
        if !rotated_x.is_finite() || !rotated_y.is_finite() {
            return None;
        }

        let y = rotated_x as i64;
        let x = self.width as i64 - 1 - rotated_y as i64;
        if self.in_bounds(x, y) {
            Some((x as usize, y as usize))
        } else {
            None
        }
    }

    /// Walkable node at `world_pos`, or `None` when the position is off the
    /// grid or on a blocked cell.
    pub fn node_at_world_position(&self, world_pos: Vec2) -> Option<Node> {
        let (x, y) = self.world_to_grid(world_pos)?;
        self.node(x, y).filter(|n| n.walkable)
    }

    /// Uniformly sample up to `attempts` cells and return the first walkable one.
    pub fn random_walkable_node<R: Rng + ?Sized>(&self, rng: &mut R, attempts: usize) -> Option<Node> {
        if self.nodes.is_empty() {
            return None;
        }
        for _ in 0..attempts {
            let x = rng.random_range(0..self.width);
            let y = rng.random_range(0..self.height);
            let node = self.nodes[self.get_index(x, y)];
            if node.walkable {
                return Some(node);
            }
        }
        debug!("No walkable node found in {} attempts", attempts);
        None
    }

    /// Node at `origin + (dx, dy)` if it is walkable; otherwise the first
    /// walkable node of the 5x5 square around that cell in row-major order;
    /// otherwise `origin` itself.
    pub fn nearest_walkable_offset(&self, origin: Node, dx: i64, dy: i64) -> Node {
        let tx = origin.x as i64 + dx;
        let ty = origin.y as i64 + dy;

        if self.in_bounds(tx, ty) {
            let target = self.nodes[self.get_index(tx as usize, ty as usize)];
            if target.walkable {
                return target;
            }
        }

        for oy in -NEAREST_SEARCH_RADIUS..=NEAREST_SEARCH_RADIUS {
            for ox in -NEAREST_SEARCH_RADIUS..=NEAREST_SEARCH_RADIUS {
                let (cx, cy) = (tx + ox, ty + oy);
                if !self.in_bounds(cx, cy) {
                    continue;
                }
                let candidate = self.nodes[self.get_index(cx as usize, cy as usize)];
                if candidate.walkable {
                    return candidate;
                }
            }
        }

        origin
    }
}
