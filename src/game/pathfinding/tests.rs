/// Planner correctness tests: route shape, hop admission, resolution rings.

use super::*;
use crate::game::grid::{Occupant, TileGrid};
use bevy::prelude::IVec2;

fn empty_grid(width: i32, height: i32) -> TileGrid {
    TileGrid::new(width, height)
}

fn tree(grid: &mut TileGrid, x: i32, y: i32) {
    grid.place(IVec2::new(x, y), Occupant::solid("Tree"));
}

fn rock(grid: &mut TileGrid, x: i32, y: i32) {
    grid.place(IVec2::new(x, y), Occupant::hoppable("Rock"));
}

fn tile(x: i32, y: i32) -> IVec2 {
    IVec2::new(x, y)
}

#[test]
fn route_length_is_chebyshev_distance_on_empty_grid() {
    let grid = empty_grid(6, 6);
    let start = tile(0, 0);

    for x in 0..6 {
        for y in 0..6 {
            let goal = tile(x, y);
            let route = find_path(start, goal, &grid).expect("open grid is fully reachable");
            let chebyshev = (goal - start).abs().max_element() as usize;
            assert_eq!(route.len(), chebyshev, "goal {:?}", goal);
            // Every move is unit cost, so cost equals length.
            assert_eq!(route_cost(&route) as usize, route.len(), "goal {:?}", goal);
        }
    }
}

#[test]
fn route_excludes_start_and_begins_adjacent_to_it() {
    let grid = empty_grid(8, 8);
    let start = tile(2, 2);
    let route = find_path(start, tile(6, 5), &grid).unwrap();

    assert_ne!(route[0].pos, start);
    assert_eq!((route[0].pos - start).abs().max_element(), 1);
    assert_eq!(route.last().unwrap().pos, tile(6, 5));
}

#[test]
fn start_equals_goal_yields_empty_route() {
    let grid = empty_grid(4, 4);
    let route = find_path(tile(2, 2), tile(2, 2), &grid).unwrap();
    assert!(route.is_empty());
}

#[test]
fn enclosed_goal_is_unreachable() {
    let mut grid = empty_grid(9, 9);
    for dx in -1..=1 {
        for dy in -1..=1 {
            if (dx, dy) != (0, 0) {
                tree(&mut grid, 5 + dx, 5 + dy);
            }
        }
    }

    assert!(find_path(tile(0, 0), tile(5, 5), &grid).is_none());
}

#[test]
fn out_of_bounds_endpoints_find_nothing() {
    let grid = empty_grid(4, 4);
    assert!(find_path(tile(-1, 0), tile(2, 2), &grid).is_none());
    assert!(find_path(tile(0, 0), tile(9, 9), &grid).is_none());
}

#[test]
fn corridor_hop_produces_jump_route() {
    // One-tile-high corridor: the only way past the rock is over it.
    let mut grid = empty_grid(10, 1);
    rock(&mut grid, 1, 0);

    let route = find_path(tile(0, 0), tile(3, 0), &grid).unwrap();
    assert_eq!(
        route,
        vec![
            RouteStep { pos: tile(1, 0), jump: true },
            RouteStep { pos: tile(2, 0), jump: false },
            RouteStep { pos: tile(3, 0), jump: false },
        ]
    );
    // Hop costs 2, each following step costs 1.
    assert_eq!(route_cost(&route), 4);
}

#[test]
fn open_grid_prefers_cheap_slip_around_a_rock() {
    // With room to maneuver, a diagonal detour (cost 3) beats the hop (cost 4).
    let mut grid = empty_grid(10, 10);
    rock(&mut grid, 1, 0);

    let route = find_path(tile(0, 0), tile(3, 0), &grid).unwrap();
    assert_eq!(route.len(), 3);
    assert!(route.iter().all(|step| !step.jump));
    assert_eq!(route_cost(&route), 3);
}

#[test]
fn hop_with_occupied_landing_is_never_generated() {
    // Corridor again, but the far side of the rock is blocked: the rock tile
    // must not appear as a neighbor at all, so the goal is unreachable.
    let mut grid = empty_grid(5, 1);
    rock(&mut grid, 1, 0);
    tree(&mut grid, 2, 0);

    assert!(find_path(tile(0, 0), tile(4, 0), &grid).is_none());
}

#[test]
fn blocked_landing_routes_around_instead() {
    let mut grid = empty_grid(6, 3);
    rock(&mut grid, 2, 1);
    tree(&mut grid, 3, 1);

    let route = find_path(tile(0, 1), tile(5, 1), &grid).unwrap();
    assert!(route.iter().all(|step| step.pos != tile(2, 1) && step.pos != tile(3, 1)));
    assert_eq!(route.last().unwrap().pos, tile(5, 1));
}

#[test]
fn planner_is_a_pure_function_of_its_inputs() {
    let mut grid = empty_grid(12, 12);
    tree(&mut grid, 4, 4);
    tree(&mut grid, 4, 5);
    rock(&mut grid, 6, 6);

    let a = find_path(tile(0, 0), tile(10, 9), &grid).unwrap();
    let b = find_path(tile(0, 0), tile(10, 9), &grid).unwrap();
    assert_eq!(a, b);
}

// ============================================================================
// Destination resolution
// ============================================================================

#[test]
fn free_destination_resolves_to_itself() {
    let grid = empty_grid(8, 8);
    assert_eq!(
        nearest_walkable_tile(tile(3, 3), tile(0, 0), &grid),
        Some(tile(3, 3))
    );
}

#[test]
fn occupied_destination_resolves_to_closest_ring_candidate() {
    let mut grid = empty_grid(12, 12);
    tree(&mut grid, 5, 5);

    // Agent stands west of the tree; the western ring tile is closest.
    assert_eq!(
        nearest_walkable_tile(tile(5, 5), tile(0, 5), &grid),
        Some(tile(4, 5))
    );
}

#[test]
fn equal_distance_candidates_resolve_in_scan_order() {
    let mut grid = empty_grid(12, 12);
    tree(&mut grid, 5, 5);
    tree(&mut grid, 5, 4);

    // From (5, 0), tiles (4, 4) and (6, 4) are equally close; the scan visits
    // lower dx first.
    assert_eq!(
        nearest_walkable_tile(tile(5, 5), tile(5, 0), &grid),
        Some(tile(4, 4))
    );
}

#[test]
fn saturated_neighborhood_fails_resolution() {
    let mut grid = empty_grid(20, 20);
    for dx in -MAX_RING_RADIUS..=MAX_RING_RADIUS {
        for dy in -MAX_RING_RADIUS..=MAX_RING_RADIUS {
            tree(&mut grid, 9 + dx, 9 + dy);
        }
    }

    assert_eq!(nearest_walkable_tile(tile(9, 9), tile(0, 0), &grid), None);
}
