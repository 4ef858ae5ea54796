use bevy::prelude::*;

use crate::game::grid::TileGrid;
use super::components::{Locomotion, LocomotionEvent, MotionTuning};
use super::events::{RouteCompleted, StepCommand};

/// Advance every agent's locomotion state by one frame. This is the only
/// place simulation time moves forward.
pub(super) fn follow_route(
    time: Res<Time>,
    tuning: Res<MotionTuning>,
    mut query: Query<(Entity, &mut Locomotion)>,
    mut completed: MessageWriter<RouteCompleted>,
) {
    let dt = time.delta_secs();
    if !dt.is_finite() || dt <= 0.0 {
        return;
    }

    for (entity, mut locomotion) in query.iter_mut() {
        if let Some(LocomotionEvent::ReachedEnd) = locomotion.advance(dt, &tuning) {
            completed.write(RouteCompleted { entity });
        }
    }
}

/// Apply manual single-step movement commands.
pub(super) fn apply_step_commands(
    mut steps: MessageReader<StepCommand>,
    grid: Res<TileGrid>,
    mut query: Query<&mut Locomotion>,
) {
    for cmd in steps.read() {
        let Ok(mut locomotion) = query.get_mut(cmd.entity) else {
            continue;
        };
        if !locomotion.step_direction(cmd.direction, &grid) {
            debug!("[MOVE] step into occupied tile ignored for {:?}", cmd.entity);
        }
    }
}
