use bevy::prelude::*;
use fixedbitset::FixedBitSet;

use crate::game::grid::TileGrid;
use super::types::{PathNode, Route, RouteStep};

/// Expansion count that suggests something is wrong with the request
/// (grids this core runs on are a few hundred tiles at most).
const EXPANSION_HIGH_WATER: usize = 10_000;

/// Neighbor offsets in fixed order: N, E, S, W, then the four diagonals.
/// The order matters — open-list ties resolve to the earliest insertion, so
/// changing it changes the shape of equal-cost routes.
const DIRECTIONS: [IVec2; 8] = [
    IVec2::new(0, 1),
    IVec2::new(1, 0),
    IVec2::new(0, -1),
    IVec2::new(-1, 0),
    IVec2::new(1, 1),
    IVec2::new(1, -1),
    IVec2::new(-1, 1),
    IVec2::new(-1, -1),
];

/// Manhattan distance. Admissible for unit-cost moves; with diagonal and
/// jump costs in play it is only an approximation, which is accepted and
/// kept as-is so route shapes stay reproducible.
fn heuristic(a: IVec2, b: IVec2) -> u32 {
    ((a.x - b.x).abs() + (a.y - b.y).abs()) as u32
}

/// Walkability of a candidate tile, approached along `dir`.
/// Returns `Some(jump)` when the tile can be entered, `None` when it blocks.
fn enterable(grid: &TileGrid, tile: IVec2, dir: IVec2) -> Option<bool> {
    match grid.get(tile) {
        None => Some(false),
        Some(occ) if occ.kind == crate::game::grid::OccupantKind::Hoppable
            && !grid.is_occupied(tile + dir) =>
        {
            // Hop onto the obstacle; the move costs extra and the landing
            // beyond it must be clear or this neighbor is never generated.
            Some(true)
        }
        Some(_) => None,
    }
}

/// Best-first search over the 8-connected tile grid.
///
/// Returns the route from `start` (exclusive) to `goal` (inclusive), with
/// each step carrying the jump flag of the move that produced it, or `None`
/// when the open list drains without reaching the goal. An unreachable goal
/// is a normal outcome, not an error.
///
/// The open list is a plain Vec scanned linearly for the minimum f. That is
/// O(V^2) where a priority queue would be O(V log V), but it keeps expansion
/// order (and therefore tie-breaking) stable, and the bounded grids this
/// runs on are small. Closed tiles are never reopened, even if a cheaper
/// path to them shows up later under the jump-cost model; in pathological
/// hop layouts this can yield a slightly suboptimal route. Known limitation.
pub fn find_path(start: IVec2, goal: IVec2, grid: &TileGrid) -> Option<Route> {
    if !grid.in_bounds(start) || !grid.in_bounds(goal) {
        return None;
    }

    let mut nodes: Vec<PathNode> = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    let mut closed = FixedBitSet::with_capacity((grid.width * grid.height) as usize);

    nodes.push(PathNode {
        pos: start,
        g: 0,
        f: heuristic(start, goal),
        parent: None,
        jump: false,
    });
    open.push(0);

    let mut expansions = 0usize;

    while !open.is_empty() {
        // First minimum wins; later equal-f entries wait their turn.
        let slot = open
            .iter()
            .enumerate()
            .min_by_key(|(_, &idx)| nodes[idx].f)
            .map(|(slot, _)| slot)?;
        let current = open.remove(slot);

        if nodes[current].pos == goal {
            return Some(reconstruct(&nodes, current));
        }

        closed.insert(grid.index(nodes[current].pos));

        expansions += 1;
        if expansions == EXPANSION_HIGH_WATER {
            warn!(
                "[PLANNER] search expanded {} nodes between {:?} and {:?} - grid larger than this planner is meant for?",
                expansions, start, goal
            );
        }

        for dir in DIRECTIONS {
            let next = nodes[current].pos + dir;
            if !grid.in_bounds(next) {
                continue;
            }
            let Some(jump) = enterable(grid, next, dir) else {
                continue;
            };
            if closed.contains(grid.index(next)) {
                continue;
            }

            let g = nodes[current].g + if jump { 2 } else { 1 };

            // Skip if the open list already holds this tile at least as cheap;
            // otherwise push a fresh entry (duplicates are allowed and the
            // cheaper one simply pops first).
            if open.iter().any(|&idx| nodes[idx].pos == next && nodes[idx].g <= g) {
                continue;
            }

            nodes.push(PathNode {
                pos: next,
                g,
                f: g + heuristic(next, goal),
                parent: Some(current),
                jump,
            });
            open.push(nodes.len() - 1);
        }
    }

    None
}

/// Walk parent links back to the start, drop the start tile itself, and
/// return the steps in travel order.
fn reconstruct(nodes: &[PathNode], goal: usize) -> Route {
    let mut steps: Route = Vec::new();
    let mut current = Some(goal);
    while let Some(idx) = current {
        steps.push(RouteStep { pos: nodes[idx].pos, jump: nodes[idx].jump });
        current = nodes[idx].parent;
    }
    // The start tile is the last element walked; routes begin at the first
    // tile the agent actually moves into.
    steps.pop();
    steps.reverse();
    steps
}

/// Total planning cost of a route under the planner's own cost model.
pub fn route_cost(route: &[RouteStep]) -> u32 {
    route.iter().map(|step| if step.jump { 2 } else { 1 }).sum()
}
