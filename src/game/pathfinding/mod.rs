mod astar;
mod nearest;
mod systems;
mod types;

#[cfg(test)]
mod tests;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use astar::{find_path, route_cost};
pub use nearest::{nearest_walkable_tile, MAX_RING_RADIUS};
pub use types::{Route, RouteStep};

use bevy::prelude::*;
use crate::game::NavSet;

pub struct PathfindingPlugin;

impl Plugin for PathfindingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, systems::process_move_commands.in_set(NavSet::Plan));
    }
}
