use sim_nav::{find_path, GridIndex, NavGridView, PathError, TileGrid, MAX_EXPANSIONS};

fn at(x: i32, y: i32) -> GridIndex {
    GridIndex::new(x, y, 0)
}

#[test]
fn open_grid_path_covers_manhattan_distance() {
    let grid = TileGrid::new(5, 5, 1);

    let path = find_path(&grid, at(0, 0), at(4, 4), MAX_EXPANSIONS).expect("path should exist");

    assert!(path.len() >= 8);
    assert_eq!(path.last(), Some(at(4, 4)));

    // Every waypoint is one orthogonal step from the previous one.
    let mut prev = at(0, 0);
    for step in path.iter() {
        assert_eq!((step.x - prev.x).abs() + (step.y - prev.y).abs(), 1);
        prev = step;
    }
}

#[test]
fn walled_goal_fails_without_partial_path() {
    let mut grid = TileGrid::new(5, 5, 1);
    for (x, y) in [(3, 3), (4, 3), (3, 4)] {
        grid.set_navigable(at(x, y), false);
    }

    assert_eq!(
        find_path(&grid, at(0, 0), at(4, 4), MAX_EXPANSIONS),
        Err(PathError::Unreachable {
            from: at(0, 0),
            to: at(4, 4),
        })
    );
}

#[test]
fn path_routes_around_blockers_through_the_gap() {
    let mut grid = TileGrid::new(5, 5, 1);
    for y in 0..5 {
        if y != 2 {
            grid.add_blocker(at(2, y));
        }
    }

    let path = find_path(&grid, at(0, 0), at(4, 0), MAX_EXPANSIONS).expect("path should exist");

    assert!(path.iter().any(|p| p == at(2, 2)));
    assert!(path.iter().all(|p| p == at(4, 0) || grid.is_walkable(p)));
}

#[test]
fn goal_is_enterable_even_when_occupied() {
    let mut grid = TileGrid::new(3, 1, 1);
    grid.add_blocker(at(2, 0));

    let path = find_path(&grid, at(0, 0), at(2, 0), MAX_EXPANSIONS).expect("goal is enterable");
    assert_eq!(path.iter().collect::<Vec<_>>(), vec![at(1, 0), at(2, 0)]);
}

#[test]
fn start_equal_to_goal_is_an_empty_path() {
    let grid = TileGrid::new(2, 2, 1);
    let path = find_path(&grid, at(1, 1), at(1, 1), MAX_EXPANSIONS).expect("trivial path");
    assert!(path.is_empty());
}

#[test]
fn out_of_bounds_endpoints_are_rejected() {
    let grid = TileGrid::new(2, 2, 1);
    assert_eq!(
        find_path(&grid, at(0, 0), at(5, 0), MAX_EXPANSIONS),
        Err(PathError::OutOfBounds(at(5, 0)))
    );
    assert_eq!(
        find_path(&grid, at(-1, 0), at(1, 1), MAX_EXPANSIONS),
        Err(PathError::OutOfBounds(at(-1, 0)))
    );
}

#[test]
fn expansion_cap_stops_runaway_search() {
    let mut grid = TileGrid::new(40, 40, 1);
    for (x, y) in [(38, 39), (39, 38)] {
        grid.set_navigable(at(x, y), false);
    }
    grid.set_navigable(at(38, 38), false);

    assert_eq!(
        find_path(&grid, at(0, 0), at(39, 39), 100),
        Err(PathError::ExpansionCap(100))
    );
}

#[test]
fn planning_is_deterministic() {
    let mut grid = TileGrid::new(10, 10, 1);
    for y in 0..10 {
        grid.set_navigable(at(5, y), false);
    }
    grid.set_navigable(at(5, 5), true);

    let a = find_path(&grid, at(1, 1), at(8, 8), MAX_EXPANSIONS).expect("path should exist");
    let b = find_path(&grid, at(1, 1), at(8, 8), MAX_EXPANSIONS).expect("path should exist");
    assert_eq!(a, b);
}

#[test]
fn blocker_counts_stack() {
    let mut grid = TileGrid::new(2, 1, 1);
    grid.add_blocker(at(1, 0));
    grid.add_blocker(at(1, 0));
    grid.remove_blocker(at(1, 0));
    assert!(grid.is_blocked(at(1, 0)));
    grid.remove_blocker(at(1, 0));
    assert!(!grid.is_blocked(at(1, 0)));
}

#[test]
#[should_panic(expected = "which has none")]
fn removing_an_absent_blocker_panics() {
    let mut grid = TileGrid::new(2, 1, 1);
    grid.remove_blocker(at(0, 0));
}

#[test]
fn spawn_and_exit_tiles_are_enumerated() {
    let mut grid = TileGrid::new(3, 3, 1);
    grid.set_spawn(at(0, 2), true);
    grid.set_exit(at(2, 0), true);
    grid.set_exit(at(2, 2), true);

    assert_eq!(grid.spawn_tiles().collect::<Vec<_>>(), vec![at(0, 2)]);
    assert_eq!(grid.exit_tiles().collect::<Vec<_>>(), vec![at(2, 0), at(2, 2)]);
}
