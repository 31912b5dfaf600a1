//! Grid navigation primitives: a grid accessor trait, a reference tile backend, A* planning and
//! continuous path following.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod astar;
pub mod grid;
pub mod math;
pub mod navigator;
pub mod tile;

pub use astar::{find_path, PathError, MAX_EXPANSIONS};
pub use grid::{Direction, GridIndex, NavGridView};
pub use math::Vec2;
pub use navigator::{NavPath, Navigator};
pub use tile::{Tile, TileGrid};
