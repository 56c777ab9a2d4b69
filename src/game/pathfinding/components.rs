use bevy::prelude::*;
use std::collections::VecDeque;

/// FIFO of world positions an agent is walking through.
///
/// Replaced wholesale by a successful path request; drained one entry at a
/// time by [`follow_path`](super::follow_path).
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct Waypoints(pub VecDeque<Vec2>);

impl Waypoints {
    pub fn new(points: impl IntoIterator<Item = Vec2>) -> Self {
        Self(points.into_iter().collect())
    }

    pub fn front(&self) -> Option<Vec2> {
        self.0.front().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Marks an agent that walks its [`Waypoints`] at `speed` world pixels per second.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PathFollower {
    pub speed: f32,
}
