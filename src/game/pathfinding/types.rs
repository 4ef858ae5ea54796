use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// One annotated tile of a planned route.
///
/// `jump` marks a step that clears a hoppable occupant; the landing tile is
/// the next non-jump step (or the route's last step when none remains).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStep {
    pub pos: IVec2,
    pub jump: bool,
}

/// Ordered tile sequence from (exclusive) start tile to goal tile.
/// Produced by the planner, consumed step-by-step by locomotion, replaced
/// wholesale whenever a new destination is set.
pub type Route = Vec<RouteStep>;

/// Search node, owned by a single `find_path` call and discarded with it.
/// `parent` is an index into the search's node arena.
#[derive(Debug, Clone, Copy)]
pub(super) struct PathNode {
    pub pos: IVec2,
    /// Cumulative cost from the start tile.
    pub g: u32,
    /// g plus the Manhattan estimate of the remaining cost.
    pub f: u32,
    pub parent: Option<usize>,
    pub jump: bool,
}
