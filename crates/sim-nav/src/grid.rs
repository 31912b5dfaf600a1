use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Vec2;

/// Tile coordinate. `z` is the floor; planning never changes floors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridIndex {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GridIndex {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(self.x + dx, self.y + dy, self.z)
    }

    /// Straight-line distance on the floor plane.
    pub fn distance(self, other: Self) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Centre of the tile in tile units.
    pub fn center(self) -> Vec2 {
        Vec2::new(self.x as f32 + 0.5, self.y as f32 + 0.5)
    }
}

impl fmt::Display for GridIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    North,
    East,
    #[default]
    South,
    West,
}

impl Direction {
    /// Neighbor expansion order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    pub fn vector(self) -> Vec2 {
        let (dx, dy) = self.offset();
        Vec2::new(dx as f32, dy as f32)
    }

    /// Direction of a single step from `from` to `to`, if they are 4-adjacent on one floor.
    pub fn between(from: GridIndex, to: GridIndex) -> Option<Self> {
        if from.z != to.z {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|dir| from.step(*dir) == to)
    }
}

/// Read access to whatever stores the tiles.
///
/// `is_blocked` reports dynamic occupancy by non-walkable objects, separate from the static
/// navigable flag so the two can be owned by different systems.
pub trait NavGridView {
    /// `(width, height, depth)` in tiles.
    fn dimensions(&self) -> (i32, i32, i32);

    fn is_navigable(&self, at: GridIndex) -> bool;

    fn is_blocked(&self, at: GridIndex) -> bool;

    fn in_bounds(&self, at: GridIndex) -> bool {
        let (w, h, d) = self.dimensions();
        at.x >= 0 && at.y >= 0 && at.z >= 0 && at.x < w && at.y < h && at.z < d
    }

    fn is_walkable(&self, at: GridIndex) -> bool {
        self.in_bounds(at) && self.is_navigable(at) && !self.is_blocked(at)
    }
}
