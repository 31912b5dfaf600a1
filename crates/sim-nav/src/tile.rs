#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{GridIndex, NavGridView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Tile {
    pub navigable: bool,
    /// Agents enter the grid here.
    pub spawn: bool,
    /// Agents leave the grid here.
    pub exit: bool,
}

impl Default for Tile {
    fn default() -> Self {
        Self {
            navigable: true,
            spawn: false,
            exit: false,
        }
    }
}

/// In-memory reference grid: static tile flags plus a count of blocking objects per tile.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TileGrid {
    width: i32,
    height: i32,
    depth: i32,
    tiles: Vec<Tile>,
    blockers: Vec<u16>,
}

impl TileGrid {
    /// A fully navigable grid.
    pub fn new(width: u32, height: u32, depth: u32) -> Self {
        assert!(width > 0 && height > 0 && depth > 0, "grid must be non-empty");
        let len = (width * height * depth) as usize;
        Self {
            width: width as i32,
            height: height as i32,
            depth: depth as i32,
            tiles: vec![Tile::default(); len],
            blockers: vec![0; len],
        }
    }

    pub fn tile(&self, at: GridIndex) -> Option<&Tile> {
        self.idx(at).map(|idx| &self.tiles[idx])
    }

    pub fn tile_mut(&mut self, at: GridIndex) -> Option<&mut Tile> {
        self.idx(at).map(|idx| &mut self.tiles[idx])
    }

    pub fn set_navigable(&mut self, at: GridIndex, navigable: bool) {
        if let Some(tile) = self.tile_mut(at) {
            tile.navigable = navigable;
        }
    }

    pub fn set_spawn(&mut self, at: GridIndex, spawn: bool) {
        if let Some(tile) = self.tile_mut(at) {
            tile.spawn = spawn;
        }
    }

    pub fn set_exit(&mut self, at: GridIndex, exit: bool) {
        if let Some(tile) = self.tile_mut(at) {
            tile.exit = exit;
        }
    }

    /// Record one more blocking object on `at`. Out-of-bounds tiles are ignored.
    pub fn add_blocker(&mut self, at: GridIndex) {
        if let Some(idx) = self.idx(at) {
            self.blockers[idx] = self.blockers[idx].saturating_add(1);
        }
    }

    /// Panics when `at` carries no blocker: every removal must pair with an earlier add.
    pub fn remove_blocker(&mut self, at: GridIndex) {
        let Some(idx) = self.idx(at) else {
            return;
        };
        assert!(
            self.blockers[idx] > 0,
            "removing a blocker from {at} which has none"
        );
        self.blockers[idx] -= 1;
    }

    pub fn blocker_count(&self, at: GridIndex) -> u16 {
        self.idx(at).map(|idx| self.blockers[idx]).unwrap_or(0)
    }

    pub fn spawn_tiles(&self) -> impl Iterator<Item = GridIndex> + '_ {
        self.indices().filter(|at| self.tiles[self.flat(*at)].spawn)
    }

    pub fn exit_tiles(&self) -> impl Iterator<Item = GridIndex> + '_ {
        self.indices().filter(|at| self.tiles[self.flat(*at)].exit)
    }

    /// Every tile in z, y, x order.
    pub fn indices(&self) -> impl Iterator<Item = GridIndex> + '_ {
        (0..self.depth).flat_map(move |z| {
            (0..self.height).flat_map(move |y| (0..self.width).map(move |x| GridIndex::new(x, y, z)))
        })
    }

    fn flat(&self, at: GridIndex) -> usize {
        ((at.z * self.height + at.y) * self.width + at.x) as usize
    }

    fn idx(&self, at: GridIndex) -> Option<usize> {
        if !self.in_bounds(at) {
            return None;
        }
        Some(self.flat(at))
    }
}

impl NavGridView for TileGrid {
    fn dimensions(&self) -> (i32, i32, i32) {
        (self.width, self.height, self.depth)
    }

    fn is_navigable(&self, at: GridIndex) -> bool {
        self.tile(at).is_some_and(|tile| tile.navigable)
    }

    fn is_blocked(&self, at: GridIndex) -> bool {
        self.blocker_count(at) > 0
    }
}
