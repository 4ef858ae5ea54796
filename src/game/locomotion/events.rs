/// Commands and notifications for agent locomotion.
///
/// Commands flow in from input or policy layers; notifications flow out to
/// whoever cares (agent policies, UI). Both are plain typed messages —
/// no stringly-typed event names anywhere.

use bevy::prelude::*;

// ============================================================================
// Commands
// ============================================================================

/// Ask an agent to walk to a world-space destination. Resolution, planning
/// and route installation all happen inside the same frame this is read.
#[derive(Event, Message, Debug, Clone)]
pub struct MoveCommand {
    pub entity: Entity,
    pub destination: Vec3,
}

/// Ask an agent to take one instantaneous step in a direction, bypassing
/// route planning entirely (manual control).
#[derive(Event, Message, Debug, Clone)]
pub struct StepCommand {
    pub entity: Entity,
    pub direction: Vec3,
}

// ============================================================================
// Notifications
// ============================================================================

/// Fired exactly once when an agent consumes the final step of its route.
#[derive(Event, Message, Debug, Clone)]
pub struct RouteCompleted {
    pub entity: Entity,
}

/// Fired when a destination resolved to a reachable tile but no route to it
/// exists. The agent keeps whatever state it had.
#[derive(Event, Message, Debug, Clone)]
pub struct NoRouteFound {
    pub entity: Entity,
}
