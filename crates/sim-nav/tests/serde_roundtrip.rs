#![cfg(feature = "serde")]

use sim_nav::{find_path, GridIndex, Navigator, TileGrid, MAX_EXPANSIONS};

#[test]
fn tile_grid_roundtrips_via_serde() {
    let mut grid = TileGrid::new(6, 4, 1);
    grid.set_navigable(GridIndex::new(3, 1, 0), false);
    grid.set_exit(GridIndex::new(5, 3, 0), true);
    grid.add_blocker(GridIndex::new(2, 2, 0));

    let json = serde_json::to_string(&grid).expect("serialize grid");
    let grid2: TileGrid = serde_json::from_str(&json).expect("deserialize grid");
    assert_eq!(grid, grid2);

    let start = GridIndex::new(0, 0, 0);
    let goal = GridIndex::new(5, 3, 0);
    assert_eq!(
        find_path(&grid, start, goal, MAX_EXPANSIONS),
        find_path(&grid2, start, goal, MAX_EXPANSIONS)
    );
}

#[test]
fn navigator_state_roundtrips_via_serde() {
    let grid = TileGrid::new(4, 4, 1);
    let mut nav = Navigator::new(GridIndex::new(0, 0, 0));
    nav.request(&grid, GridIndex::new(3, 3, 0), MAX_EXPANSIONS)
        .expect("open grid");
    nav.advance(0.3, 1.0);

    let json = serde_json::to_string(&nav).expect("serialize navigator");
    let nav2: Navigator = serde_json::from_str(&json).expect("deserialize navigator");
    assert_eq!(nav, nav2);
}
