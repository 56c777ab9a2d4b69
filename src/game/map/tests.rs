/// Tests for grid construction and isometric coordinate conversion.

use super::*;
use super::generation::{generate_tile_map, MapGenParams};
use bevy::prelude::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Helper to build a graph from an ASCII layout (`#` blocked, anything else walkable).
/// Row 0 of the layout is grid row y = 0.
fn graph_from_layout(layout: &[&str]) -> MapGraph {
    let height = layout.len();
    let width = layout[0].len();
    let mut map = TileMap::new(width, height, 64.0, 32.0);
    let walls = map.ensure_layer("collision");
    for (y, row) in layout.iter().enumerate() {
        for (x, c) in row.chars().enumerate() {
            if c == '#' {
                walls.set_tile(x, y, Some(1));
            }
        }
    }
    MapGraph::build(&map, "collision")
}

#[test]
fn test_build_marks_collision_tiles_blocked() {
    let graph = graph_from_layout(&[
        ".#.",
        "...",
        "##.",
    ]);

    assert_eq!(graph.width, 3);
    assert_eq!(graph.height, 3);
    assert!(!graph.is_walkable(1, 0));
    assert!(!graph.is_walkable(0, 2));
    assert!(!graph.is_walkable(1, 2));
    assert!(graph.is_walkable(2, 2));
    assert_eq!(graph.walkable_count(), 6);
}

#[test]
fn test_missing_collision_layer_is_all_walkable() {
    let map = TileMap::new(4, 3, 64.0, 32.0);
    let graph = MapGraph::build(&map, "collision");
    assert_eq!(graph.walkable_count(), 12);
}

#[test]
fn test_node_identity_ignores_walkability() {
    let a = Node::new(2, 3, true);
    let b = Node::new(2, 3, false);
    assert_eq!(a, b);
    assert_ne!(a, Node::new(3, 2, true));
}

#[test]
fn test_world_round_trip_for_every_walkable_node() {
    let map = generate_tile_map(&MapGenParams::new(23, 17, 64.0, 32.0, 7), "collision");
    let graph = MapGraph::build(&map, "collision");

    for node in graph.nodes().iter().filter(|n| n.walkable) {
        let world = graph.to_world_position(*node);
        let back = graph.node_at_world_position(world)
            .unwrap_or_else(|| panic!("node {:?} at {:?} did not map back", node, world));
        assert_eq!((back.x, back.y), (node.x, node.y));
    }
}

#[test]
fn test_round_trip_tolerates_offsets_inside_cell() {
    let graph = MapGraph::from_fn(10, 10, 64.0, 32.0, |_, _| true);
    let node = graph.node(4, 6).unwrap();
    let center = graph.to_world_position(node);

    for offset in [
        Vec2::new(10.0, 0.0),
        Vec2::new(-10.0, 0.0),
        Vec2::new(0.0, 5.0),
        Vec2::new(0.0, -5.0),
        Vec2::new(6.0, 3.0),
    ] {
        assert_eq!(graph.node_at_world_position(center + offset), Some(node),
                   "offset {:?} left the cell", offset);
    }
}

#[test]
fn test_adjacent_cells_are_one_half_tile_apart() {
    let graph = MapGraph::from_fn(5, 5, 64.0, 32.0, |_, _| true);
    let a = graph.to_world_position(graph.node(2, 2).unwrap());
    let east = graph.to_world_position(graph.node(3, 2).unwrap());
    let south = graph.to_world_position(graph.node(2, 3).unwrap());

    assert_eq!(east - a, Vec2::new(-32.0, -16.0));
    assert_eq!(south - a, Vec2::new(32.0, -16.0));
}

#[test]
fn test_cell_centers_have_non_negative_y() {
    let graph = MapGraph::from_fn(8, 6, 64.0, 32.0, |_, _| true);
    for node in graph.nodes() {
        assert!(graph.to_world_position(*node).y >= 0.0);
    }
}

#[test]
fn test_node_at_world_position_rejects_out_of_bounds() {
    let graph = MapGraph::from_fn(5, 5, 64.0, 32.0, |_, _| true);
    assert_eq!(graph.node_at_world_position(Vec2::new(-500.0, -500.0)), None);
    assert_eq!(graph.node_at_world_position(Vec2::new(10_000.0, 40.0)), None);
    assert_eq!(graph.world_to_grid(Vec2::new(f32::NAN, 0.0)), None);
}

#[test]
fn test_node_at_world_position_rejects_blocked_cell() {
    let graph = graph_from_layout(&[
        "...",
        ".#.",
        "...",
    ]);
    let blocked = graph.node(1, 1).unwrap();
    let world = graph.to_world_position(blocked);

    assert_eq!(graph.world_to_grid(world), Some((1, 1)));
    assert_eq!(graph.node_at_world_position(world), None);
}

#[test]
fn test_neighbors_stay_in_bounds() {
    let graph = MapGraph::from_fn(4, 3, 64.0, 32.0, |_, _| true);

    for node in graph.nodes() {
        for n in graph.neighbors(*node) {
            assert!(n.x < graph.width && n.y < graph.height);
            assert_ne!(n, *node);
        }
    }

    assert_eq!(graph.neighbors(graph.node(0, 0).unwrap()).len(), 3);
    assert_eq!(graph.neighbors(graph.node(1, 1).unwrap()).len(), 8);
    assert_eq!(graph.neighbors(graph.node(3, 1).unwrap()).len(), 5);
}

#[test]
fn test_neighbors_include_blocked_cells() {
    let graph = graph_from_layout(&[
        "#..",
        "...",
        "...",
    ]);
    let neighbors = graph.neighbors(graph.node(1, 1).unwrap());
    assert!(neighbors.iter().any(|n| n.x == 0 && n.y == 0 && !n.walkable));
}

#[test]
fn test_random_walkable_node_hits_only_walkable() {
    let graph = graph_from_layout(&[
        "####",
        "#..#",
        "####",
    ]);
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..20 {
        if let Some(node) = graph.random_walkable_node(&mut rng, 100) {
            assert!(node.walkable);
            assert_eq!(node.y, 1);
        }
    }
}

#[test]
fn test_random_walkable_node_reports_failure() {
    let graph = MapGraph::from_fn(6, 6, 64.0, 32.0, |_, _| false);
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(graph.random_walkable_node(&mut rng, 100), None);

    let empty = MapGraph::empty();
    assert_eq!(empty.random_walkable_node(&mut rng, 100), None);
}

#[test]
fn test_nearest_walkable_offset_prefers_exact_target() {
    let graph = MapGraph::from_fn(10, 10, 64.0, 32.0, |_, _| true);
    let origin = graph.node(5, 5).unwrap();
    assert_eq!(graph.nearest_walkable_offset(origin, 2, -1), graph.node(7, 4).unwrap());
}

#[test]
fn test_nearest_walkable_offset_scans_row_major() {
    // Target (5,5) blocked; the 5x5 square around it is blocked except for
    // (6,4) and (4,6). Row-major order visits y=4 first.
    let graph = MapGraph::from_fn(10, 10, 64.0, 32.0, |x, y| {
        let in_square = (3..=7).contains(&x) && (3..=7).contains(&y);
        !in_square || (x, y) == (6, 4) || (x, y) == (4, 6) || (x, y) == (1, 1)
    });
    let origin = graph.node(1, 1).unwrap();
    let found = graph.nearest_walkable_offset(origin, 4, 4);
    assert_eq!((found.x, found.y), (6, 4));
}

#[test]
fn test_nearest_walkable_offset_falls_back_to_origin() {
    let graph = MapGraph::from_fn(12, 12, 64.0, 32.0, |x, y| (x, y) == (0, 0));
    let origin = graph.node(0, 0).unwrap();
    assert_eq!(graph.nearest_walkable_offset(origin, 8, 8), origin);
}

#[test]
fn test_nearest_walkable_offset_handles_target_off_grid() {
    let graph = MapGraph::from_fn(5, 5, 64.0, 32.0, |_, _| true);
    let origin = graph.node(4, 4).unwrap();
    // Target (6,6) is off grid; the square around it reaches (4,4) first.
    let found = graph.nearest_walkable_offset(origin, 2, 2);
    assert_eq!((found.x, found.y), (4, 4));
}

#[test]
fn test_generation_is_deterministic_and_walled() {
    let params = MapGenParams::new(20, 15, 64.0, 32.0, 99);
    let a = generate_tile_map(&params, "collision");
    let b = generate_tile_map(&params, "collision");
    assert_eq!(a, b);

    let walls = a.layer("collision").unwrap();
    for x in 0..20 {
        assert!(walls.is_occupied(x, 0));
        assert!(walls.is_occupied(x, 14));
    }
    for y in 0..15 {
        assert!(walls.is_occupied(0, y));
        assert!(walls.is_occupied(19, y));
    }
    // Ring just inside the border is never filled by obstacles.
    for x in 1..19 {
        assert!(!walls.is_occupied(x, 1));
    }
}
