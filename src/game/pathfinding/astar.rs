use bevy::prelude::*;
use fixedbitset::FixedBitSet;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::game::fixed_math::{grid_distance, FixedNum};
use crate::game::map::{MapGraph, Node};

/// Expansions above which a single search is reported as slow.
const SLOW_SEARCH_EXPANSIONS: usize = 10_000;

/// Per-node search bookkeeping for one A* run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeCosts {
    /// Cost of the best known route from the search origin.
    pub g_cost: FixedNum,
    /// Heuristic estimate to the search target.
    pub h_cost: FixedNum,
    /// Grid index of the predecessor on the best known route.
    pub parent: Option<usize>,
}

impl NodeCosts {
    pub const UNVISITED: Self = Self {
        g_cost: FixedNum::MAX,
        h_cost: FixedNum::ZERO,
        parent: None,
    };

    pub fn f_cost(&self) -> FixedNum {
        self.g_cost.saturating_add(self.h_cost)
    }
}

/// Open-set entry. Min-ordered by f cost, then h cost, then insertion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct OpenEntry {
    f_cost: FixedNum,
    h_cost: FixedNum,
    sequence: u64,
    index: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap
        other.f_cost.cmp(&self.f_cost)
            .then_with(|| other.h_cost.cmp(&self.h_cost))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Side table holding all search-scoped state, indexed by grid index.
///
/// Every search starts by resetting the table, so costs and parent links from
/// an earlier search can never influence a later one. The grid itself is
/// never mutated by a search.
#[derive(Default, Debug)]
pub struct SearchScratch {
    costs: Vec<NodeCosts>,
    closed: FixedBitSet,
    in_open: FixedBitSet,
    open: BinaryHeap<OpenEntry>,
    sequence: u64,
}

impl SearchScratch {
    fn reset(&mut self, len: usize) {
        self.costs.clear();
        self.costs.resize(len, NodeCosts::UNVISITED);
        self.closed.clear();
        self.closed.grow(len);
        self.in_open.clear();
        self.in_open.grow(len);
        self.open.clear();
        self.sequence = 0;
    }

    fn push(&mut self, index: usize) {
        let costs = self.costs[index];
        self.open.push(OpenEntry {
            f_cost: costs.f_cost(),
            h_cost: costs.h_cost,
            sequence: self.sequence,
            index,
        });
        self.sequence += 1;
        self.in_open.insert(index);
    }

    /// Costs recorded for `index` by the most recent search.
    pub fn costs(&self, index: usize) -> Option<&NodeCosts> {
        self.costs.get(index)
    }
}

/// Grid A* over the 8-connected [`MapGraph`].
///
/// Edge cost is the Euclidean step length (1 for cardinal moves, √2 for
/// diagonals) and the heuristic is the Euclidean grid distance to the target,
/// which is admissible and consistent for these costs.
///
/// The pathfinder keeps its scratch buffers between calls to avoid
/// reallocating, but clears them at the start of each search.
#[derive(Resource, Default, Debug)]
pub struct AStarPathfinder {
    scratch: SearchScratch,
}

impl AStarPathfinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Search state left behind by the last call to [`find_path`](Self::find_path).
    pub fn scratch(&self) -> &SearchScratch {
        &self.scratch
    }

    /// Cost-optimal walkable route from `start` to `target`.
    ///
    /// Returns the nodes after `start` up to and including `target`. An empty
    /// vector means either `start == target` or no route exists.
    pub fn find_path(&mut self, graph: &MapGraph, start: Node, target: Node) -> Vec<Node> {
        if graph.node(start.x, start.y).is_none() || graph.node(target.x, target.y).is_none() {
            warn!("[PATHFINDING] Endpoint outside grid: start {:?}, target {:?}", start, target);
            return Vec::new();
        }
        if start == target {
            return Vec::new();
        }

        let scratch = &mut self.scratch;
        scratch.reset(graph.len());

        let start_idx = graph.get_index(start.x, start.y);
        let target_idx = graph.get_index(target.x, target.y);
        scratch.costs[start_idx] = NodeCosts {
            g_cost: FixedNum::ZERO,
            h_cost: grid_distance(start.x, start.y, target.x, target.y),
            parent: None,
        };
        scratch.push(start_idx);

        let mut expansions = 0;
        while let Some(entry) = scratch.open.pop() {
            let current_idx = entry.index;
            if scratch.closed.contains(current_idx) {
                continue; // Superseded entry
            }
            scratch.in_open.set(current_idx, false);

            if current_idx == target_idx {
                if expansions > SLOW_SEARCH_EXPANSIONS {
                    warn!("[PATHFINDING] A* used {} expansions (high!)", expansions);
                }
                return retrace(graph, scratch, start_idx, target_idx);
            }

            scratch.closed.insert(current_idx);
            expansions += 1;

            let current = graph.nodes()[current_idx];
            let current_g = scratch.costs[current_idx].g_cost;

            for neighbor in graph.neighbors(current) {
                let neighbor_idx = graph.get_index(neighbor.x, neighbor.y);
                if !neighbor.walkable || scratch.closed.contains(neighbor_idx) {
                    continue;
                }

                let tentative = current_g + grid_distance(current.x, current.y, neighbor.x, neighbor.y);
                if tentative < scratch.costs[neighbor_idx].g_cost || !scratch.in_open.contains(neighbor_idx) {
                    scratch.costs[neighbor_idx] = NodeCosts {
                        g_cost: tentative,
                        h_cost: grid_distance(neighbor.x, neighbor.y, target.x, target.y),
                        parent: Some(current_idx),
                    };
                    scratch.push(neighbor_idx);
                }
            }
        }

        debug!("[PATHFINDING] No route from {:?} to {:?} after {} expansions", start, target, expansions);
        Vec::new()
    }
}

/// Convenience wrapper running a one-off search with fresh scratch buffers.
pub fn find_path(graph: &MapGraph, start: Node, target: Node) -> Vec<Node> {
    AStarPathfinder::new().find_path(graph, start, target)
}

fn retrace(graph: &MapGraph, scratch: &SearchScratch, start_idx: usize, target_idx: usize) -> Vec<Node> {
    let mut path = Vec::new();
    let mut current = target_idx;

    while current != start_idx {
        path.push(graph.nodes()[current]);
        match scratch.costs[current].parent {
            Some(parent) => current = parent,
            None => {
                error!("[PATHFINDING] Broken parent chain at index {}", current);
                return Vec::new();
            }
        }
    }

    path.reverse();
    path
}
