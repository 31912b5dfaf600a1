use core::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use thiserror::Error;

use crate::{Direction, GridIndex, NavGridView, NavPath};

/// Default bound on node expansions per search.
pub const MAX_EXPANSIONS: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("{0} is outside the grid")]
    OutOfBounds(GridIndex),

    #[error("no route from {from} to {to}")]
    Unreachable { from: GridIndex, to: GridIndex },

    #[error("search gave up after {0} expansions")]
    ExpansionCap(usize),
}

#[derive(Debug)]
struct OpenNode {
    f: f32,
    g: u32,
    cell: GridIndex,
    tie: u64,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.g.cmp(&self.g))
            .then_with(|| other.cell.cmp(&self.cell))
            .then_with(|| other.tie.cmp(&self.tie))
    }
}

/// A* over 4-neighbors on one floor with unit step cost and a Euclidean heuristic.
///
/// A neighbor is enterable when it is the goal, or navigable and not blocked. The returned path
/// holds every step after `start`, ending at `goal`; it is empty when `start == goal`.
pub fn find_path<G>(
    grid: &G,
    start: GridIndex,
    goal: GridIndex,
    max_expansions: usize,
) -> Result<NavPath, PathError>
where
    G: NavGridView + ?Sized,
{
    if !grid.in_bounds(start) {
        return Err(PathError::OutOfBounds(start));
    }
    if !grid.in_bounds(goal) {
        return Err(PathError::OutOfBounds(goal));
    }
    if start == goal {
        return Ok(NavPath::default());
    }

    let mut open = BinaryHeap::<OpenNode>::new();
    let mut tie: u64 = 0;
    let mut g_score = BTreeMap::<GridIndex, u32>::new();
    let mut came_from = BTreeMap::<GridIndex, GridIndex>::new();
    let mut expansions = 0usize;

    g_score.insert(start, 0);
    open.push(OpenNode {
        f: start.distance(goal),
        g: 0,
        cell: start,
        tie,
    });
    tie += 1;

    while let Some(node) = open.pop() {
        if node.cell == goal {
            let path = reconstruct(&came_from, goal);
            tracing::trace!(%start, %goal, steps = path.len(), expansions, "path found");
            return Ok(path);
        }

        if g_score.get(&node.cell).is_some_and(|g| node.g != *g) {
            // Stale heap entry.
            continue;
        }

        expansions += 1;
        if expansions > max_expansions {
            return Err(PathError::ExpansionCap(max_expansions));
        }

        for dir in Direction::ALL {
            let n = node.cell.step(dir);
            if n != goal && !grid.is_walkable(n) {
                continue;
            }

            let tentative_g = node.g.saturating_add(1);
            if g_score.get(&n).is_some_and(|g| tentative_g >= *g) {
                continue;
            }

            came_from.insert(n, node.cell);
            g_score.insert(n, tentative_g);
            open.push(OpenNode {
                f: tentative_g as f32 + n.distance(goal),
                g: tentative_g,
                cell: n,
                tie,
            });
            tie += 1;
        }
    }

    Err(PathError::Unreachable {
        from: start,
        to: goal,
    })
}

fn reconstruct(came_from: &BTreeMap<GridIndex, GridIndex>, goal: GridIndex) -> NavPath {
    let mut out = vec![goal];
    let mut current = goal;
    while let Some(prev) = came_from.get(&current) {
        current = *prev;
        out.push(current);
    }
    // Drop the start cell.
    out.pop();
    out.reverse();
    NavPath::new(out)
}
