use sim_nav::{Direction, GridIndex, Navigator, PathError, TileGrid, Vec2, MAX_EXPANSIONS};

fn at(x: i32, y: i32) -> GridIndex {
    GridIndex::new(x, y, 0)
}

#[test]
fn same_destination_does_not_replan() {
    let grid = TileGrid::new(5, 5, 1);
    let mut nav = Navigator::new(at(0, 0));

    assert_eq!(nav.request(&grid, at(4, 0), MAX_EXPANSIONS), Ok(true));
    nav.advance(1.0, 1.0);
    assert_eq!(nav.request(&grid, at(4, 0), MAX_EXPANSIONS), Ok(false));
    assert_eq!(nav.path().len(), 3);

    assert_eq!(nav.request(&grid, at(1, 3), MAX_EXPANSIONS), Ok(true));
    assert_eq!(nav.destination(), Some(at(1, 3)));
    assert_eq!(nav.path().last(), Some(at(1, 3)));
}

#[test]
fn failed_request_clears_the_path() {
    let mut grid = TileGrid::new(3, 3, 1);
    let mut nav = Navigator::new(at(0, 0));
    nav.request(&grid, at(2, 0), MAX_EXPANSIONS).expect("open grid");

    for y in 0..3 {
        grid.set_navigable(at(1, y), false);
    }
    assert!(matches!(
        nav.request(&grid, at(2, 2), MAX_EXPANSIONS),
        Err(PathError::Unreachable { .. })
    ));
    assert!(!nav.is_moving());
    assert_eq!(nav.destination(), None);
}

#[test]
fn advance_integrates_sub_tile_offset_and_facing() {
    let grid = TileGrid::new(5, 5, 1);
    let mut nav = Navigator::new(at(0, 0));
    nav.request(&grid, at(2, 0), MAX_EXPANSIONS).expect("open grid");

    assert_eq!(nav.advance(0.25, 2.0), 0);
    assert_eq!(nav.tile(), at(0, 0));
    assert_eq!(nav.facing(), Direction::East);
    assert_eq!(nav.offset(), Vec2::new(0.5, 0.0));

    assert_eq!(nav.advance(0.5, 2.0), 1);
    assert_eq!(nav.tile(), at(1, 0));
    assert_eq!(nav.offset(), Vec2::new(0.5, 0.0));

    assert_eq!(nav.advance(10.0, 2.0), 1);
    assert!(nav.has_arrived(at(2, 0)));
    assert_eq!(nav.offset(), Vec2::ZERO);
}

#[test]
fn movement_does_not_depend_on_frame_rate() {
    let grid = TileGrid::new(8, 1, 1);
    let mut coarse = Navigator::new(at(0, 0));
    let mut fine = Navigator::new(at(0, 0));
    coarse.request(&grid, at(7, 0), MAX_EXPANSIONS).expect("open grid");
    fine.request(&grid, at(7, 0), MAX_EXPANSIONS).expect("open grid");

    coarse.advance(1.0, 3.0);
    for _ in 0..4 {
        fine.advance(0.25, 3.0);
    }

    assert_eq!(coarse.tile(), fine.tile());
    assert_eq!(coarse.tile(), at(3, 0));
}

#[test]
fn clear_stops_movement() {
    let grid = TileGrid::new(5, 1, 1);
    let mut nav = Navigator::new(at(0, 0));
    nav.request(&grid, at(4, 0), MAX_EXPANSIONS).expect("open grid");
    nav.clear();

    assert_eq!(nav.advance(1.0, 5.0), 0);
    assert_eq!(nav.tile(), at(0, 0));
}

#[test]
fn turning_after_a_new_request_does_not_jump() {
    let grid = TileGrid::new(5, 5, 1);
    let mut nav = Navigator::new(at(1, 1));
    nav.request(&grid, at(3, 1), MAX_EXPANSIONS).expect("open grid");
    nav.advance(0.5, 1.0);
    assert_eq!(nav.offset(), Vec2::new(0.5, 0.0));

    nav.request(&grid, at(1, 3), MAX_EXPANSIONS).expect("open grid");
    let mut last = nav.position();
    for _ in 0..40 {
        nav.advance(0.1, 1.0);
        let moved = nav.position().distance(last);
        assert!(moved <= 0.1 + 1e-4, "moved {moved} in one frame");
        last = nav.position();
    }

    assert!(nav.has_arrived(at(1, 3)));
    assert_eq!(nav.facing(), Direction::South);
    assert_eq!(nav.offset(), Vec2::ZERO);
}

#[test]
fn cleared_path_settles_back_to_the_tile_centre() {
    let grid = TileGrid::new(5, 1, 1);
    let mut nav = Navigator::new(at(0, 0));
    nav.request(&grid, at(4, 0), MAX_EXPANSIONS).expect("open grid");
    nav.advance(0.4, 1.0);
    nav.clear();

    assert_eq!(nav.advance(0.1, 1.0), 0);
    assert!((nav.offset().x - 0.3).abs() < 1e-5);
    nav.advance(1.0, 1.0);
    assert_eq!(nav.offset(), Vec2::ZERO);
    assert_eq!(nav.tile(), at(0, 0));
}
