use std::collections::VecDeque;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{astar, Direction, GridIndex, NavGridView, PathError, Vec2};

/// Offsets shorter than this count as the tile centre.
const SETTLED: f32 = 1e-4;

/// Waypoints consumed front to back. The agent's current tile is not included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavPath {
    waypoints: VecDeque<GridIndex>,
}

impl NavPath {
    pub fn new(waypoints: impl IntoIterator<Item = GridIndex>) -> Self {
        Self {
            waypoints: waypoints.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn front(&self) -> Option<GridIndex> {
        self.waypoints.front().copied()
    }

    pub fn pop_front(&mut self) -> Option<GridIndex> {
        self.waypoints.pop_front()
    }

    pub fn last(&self) -> Option<GridIndex> {
        self.waypoints.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = GridIndex> + '_ {
        self.waypoints.iter().copied()
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
    }
}

/// Per-agent movement state: the occupied tile, the sub-tile offset towards the next waypoint,
/// facing and the live path.
///
/// Planning happens on the discrete tick through [`Navigator::request`]; movement is integrated
/// separately by [`Navigator::advance`] at whatever rate the caller runs it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Navigator {
    tile: GridIndex,
    offset: Vec2,
    facing: Direction,
    destination: Option<GridIndex>,
    path: NavPath,
}

impl Navigator {
    pub fn new(tile: GridIndex) -> Self {
        Self {
            tile,
            offset: Vec2::ZERO,
            facing: Direction::default(),
            destination: None,
            path: NavPath::default(),
        }
    }

    pub fn tile(&self) -> GridIndex {
        self.tile
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn destination(&self) -> Option<GridIndex> {
        self.destination
    }

    pub fn path(&self) -> &NavPath {
        &self.path
    }

    /// Continuous position in tile units.
    pub fn position(&self) -> Vec2 {
        self.tile.center() + self.offset
    }

    pub fn is_moving(&self) -> bool {
        !self.path.is_empty()
    }

    pub fn has_arrived(&self, goal: GridIndex) -> bool {
        self.tile == goal && self.path.is_empty()
    }

    /// Move to `tile` at once, dropping any live path.
    pub fn place(&mut self, tile: GridIndex) {
        self.tile = tile;
        self.offset = Vec2::ZERO;
        self.clear();
    }

    /// Plan a path to `goal`. Returns `Ok(false)` without planning when a path to the same
    /// destination is already live; a different destination replaces the path outright.
    pub fn request<G>(
        &mut self,
        grid: &G,
        goal: GridIndex,
        max_expansions: usize,
    ) -> Result<bool, PathError>
    where
        G: NavGridView + ?Sized,
    {
        if self.destination == Some(goal) && (self.is_moving() || self.tile == goal) {
            return Ok(false);
        }

        match astar::find_path(grid, self.tile, goal, max_expansions) {
            Ok(path) => {
                self.path = path;
                self.destination = Some(goal);
                Ok(true)
            }
            Err(err) => {
                self.clear();
                Err(err)
            }
        }
    }

    pub fn clear(&mut self) {
        self.path.clear();
        self.destination = None;
    }

    /// Walk along the path for `dt_seconds` at `speed` tiles per second. Returns the number of
    /// tiles entered.
    ///
    /// Any part of the offset that does not point at the next waypoint (left over from a
    /// replaced or cleared path) is walked back towards the tile centre before moving on, so
    /// the position never jumps.
    pub fn advance(&mut self, dt_seconds: f32, speed: f32) -> u32 {
        let mut budget = (speed * dt_seconds).max(0.0);
        let mut entered = 0;

        while budget > 0.0 {
            let next = self.path.front();
            let dir = next.and_then(|next| Direction::between(self.tile, next));
            if let (Some(next), None) = (next, dir) {
                // Not adjacent (the tile was changed under us); snap.
                self.tile = next;
                self.offset = Vec2::ZERO;
                self.path.pop_front();
                entered += 1;
                continue;
            }

            let step = dir.map_or(Vec2::ZERO, |dir| dir.vector());
            let travelled = self.offset.dot(step).clamp(0.0, 1.0);
            let drift = self.offset - step * travelled;
            let off = drift.length();
            if off > SETTLED {
                let settle = budget.min(off);
                self.offset = self.offset - drift * (settle / off);
                budget -= settle;
                continue;
            }

            let (Some(next), Some(dir)) = (next, dir) else {
                self.offset = Vec2::ZERO;
                break;
            };
            self.facing = dir;
            let remaining = 1.0 - travelled;

            if budget >= remaining {
                self.tile = next;
                self.offset = Vec2::ZERO;
                self.path.pop_front();
                budget -= remaining;
                entered += 1;
            } else {
                self.offset = step * (travelled + budget);
                budget = 0.0;
            }
        }

        entered
    }
}
