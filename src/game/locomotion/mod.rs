mod components;
mod events;
mod jump;
mod systems;


// ============================================================================
// PUBLIC API
// ============================================================================

pub use components::{Locomotion, LocomotionEvent, MotionTuning};
pub use events::{MoveCommand, NoRouteFound, RouteCompleted, StepCommand};
pub use jump::JumpArc;

use bevy::prelude::*;
use crate::game::NavSet;

pub struct LocomotionPlugin;

impl Plugin for LocomotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<MoveCommand>();
        app.add_message::<StepCommand>();
        app.add_message::<RouteCompleted>();
        app.add_message::<NoRouteFound>();

        app.init_resource::<MotionTuning>();

        app.configure_sets(
            Update,
            (NavSet::Decide, NavSet::Plan, NavSet::Advance).chain(),
        );
        app.add_systems(
            Update,
            (
                systems::apply_step_commands.in_set(NavSet::Plan),
                systems::follow_route.in_set(NavSet::Advance),
            ),
        );
    }
}
