use bevy::prelude::*;
use std::time::Instant;

use crate::game::grid::{tile_of, TileGrid};
use crate::game::locomotion::{Locomotion, LocomotionEvent, MoveCommand, NoRouteFound, RouteCompleted};
use super::astar::find_path;
use super::nearest::{nearest_walkable_tile, MAX_RING_RADIUS};

/// Resolve and plan every pending move command, installing the fresh route
/// into the agent's locomotion state in the same frame.
///
/// Planning is synchronous: on a large grid this is the one latency spike in
/// the core, and that is accepted (no cancellation, no incremental search).
pub(super) fn process_move_commands(
    mut moves: MessageReader<MoveCommand>,
    grid: Res<TileGrid>,
    mut query: Query<&mut Locomotion>,
    mut completed: MessageWriter<RouteCompleted>,
    mut failed: MessageWriter<NoRouteFound>,
) {
    for cmd in moves.read() {
        let Ok(mut locomotion) = query.get_mut(cmd.entity) else {
            warn!("[PLANNER] move command for entity {:?} without locomotion", cmd.entity);
            continue;
        };

        let start = tile_of(locomotion.position());
        let requested = tile_of(cmd.destination);

        // A destination on top of an occupant walks to the nearest free tile
        // instead; with nothing free nearby the command is dropped outright.
        let Some(goal) = nearest_walkable_tile(requested, start, &grid) else {
            debug!(
                "[PLANNER] no walkable tile within {} rings of {:?}, dropping command",
                MAX_RING_RADIUS, requested
            );
            continue;
        };

        let planning_started = Instant::now();
        match find_path(start, goal, &grid) {
            Some(route) => {
                debug!(
                    "[PLANNER] {:?}: {} steps from {:?} to {:?} in {:?}",
                    cmd.entity,
                    route.len(),
                    start,
                    goal,
                    planning_started.elapsed()
                );
                if let Some(LocomotionEvent::ReachedEnd) = locomotion.set_route(route) {
                    // Destination resolved to the tile the agent is standing on.
                    completed.write(RouteCompleted { entity: cmd.entity });
                }
            }
            None => {
                failed.write(NoRouteFound { entity: cmd.entity });
            }
        }

        let elapsed = planning_started.elapsed();
        if elapsed.as_millis() > 100 {
            warn!(
                "[PLANNER] slow search: {:?} from {:?} to {:?}",
                elapsed, start, goal
            );
        }
    }
}
