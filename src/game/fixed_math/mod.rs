//! Deterministic fixed-point arithmetic for path costs.
//!
//! Search costs are accumulated in fixed point so that open-set ordering is a
//! total order and identical inputs always produce identical paths, regardless
//! of platform float behavior.

use fixed::types::I48F16;

/// Fixed-point number type used for A* costs.
///
/// I48F16: 48 integer bits, 16 fractional bits (precision ~0.000015).
pub type FixedNum = I48F16;

/// Euclidean distance between two grid cells, in cells.
///
/// Serves both as the edge cost between 8-neighbors (1 or √2) and as the
/// heuristic toward the search target.
pub fn grid_distance(ax: usize, ay: usize, bx: usize, by: usize) -> FixedNum {
    let dx = ax.abs_diff(bx) as i64;
    let dy = ay.abs_diff(by) as i64;
    let len_sq = FixedNum::from_num(dx * dx + dy * dy);
    if len_sq == FixedNum::ZERO {
        return FixedNum::ZERO;
    }
    len_sq.sqrt()
}
