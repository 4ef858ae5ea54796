/// Agent decision layer: when and where to request a new route.
///
/// Player-controlled and autonomous agents share the same locomotion
/// controller; what differs is the policy composed next to it. Policies are
/// plain trait objects, never a type hierarchy over the controller.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::grid::{tile_center, TileGrid};
use crate::game::locomotion::{MoveCommand, NoRouteFound, RouteCompleted};
use crate::game::NavSet;

// ============================================================================
// Policy interface
// ============================================================================

/// Decides when an agent should ask for a new route. Hooks are invoked from
/// locomotion notifications; `decide_next_destination` is ticked every frame
/// and returns a world-space destination when a route should be requested.
pub trait AgentPolicy: Send + Sync + 'static {
    fn on_route_completed(&mut self) {}

    fn on_no_route_found(&mut self) {}

    fn decide_next_destination(&mut self, dt: f32, grid: &TileGrid) -> Option<Vec3> {
        let _ = (dt, grid);
        None
    }
}

/// The policy composed with an agent's locomotion controller.
#[derive(Component)]
pub struct Agent {
    policy: Box<dyn AgentPolicy>,
}

impl Agent {
    pub fn new(policy: impl AgentPolicy) -> Self {
        Self { policy: Box::new(policy) }
    }
}

/// Marker for the externally commanded agent (click-to-move, manual steps).
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PlayerControlled;

// ============================================================================
// Policies
// ============================================================================

/// Player agents never decide on their own; destinations arrive as external
/// `MoveCommand`s and the notifications go to the UI layer, not to us.
pub struct PlayerPolicy;

impl AgentPolicy for PlayerPolicy {}

/// Roams the grid indefinitely: pick a random free tile, walk there, pause,
/// repeat. No path means try again after a fixed delay. All randomness comes
/// from a seeded generator so runs are reproducible.
pub struct WanderPolicy {
    rng: StdRng,
    /// Countdown until the next destination request; `None` while walking.
    pending: Option<f32>,
    idle_min: f32,
    idle_max: f32,
    retry_delay: f32,
}

impl WanderPolicy {
    pub fn new(seed: u64, idle_min: f32, idle_max: f32, retry_delay: f32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            // Decide on the very first frame, as if just dropped into the world.
            pending: Some(0.0),
            idle_min,
            idle_max,
            retry_delay,
        }
    }

    /// Rejection-sample a uniformly random unoccupied tile. Gives up after
    /// scanning the grid's worth of attempts so a fully occupied world can't
    /// spin forever.
    fn pick_destination(&mut self, grid: &TileGrid) -> Option<IVec2> {
        if grid.width <= 0 || grid.height <= 0 {
            return None;
        }
        let attempts = (grid.width * grid.height).max(16);
        for _ in 0..attempts {
            let tile = IVec2::new(
                self.rng.random_range(0..grid.width),
                self.rng.random_range(0..grid.height),
            );
            if !grid.is_occupied(tile) {
                return Some(tile);
            }
        }
        warn!("[WANDER] no free tile found after {} attempts", attempts);
        None
    }
}

impl AgentPolicy for WanderPolicy {
    fn on_route_completed(&mut self) {
        let pause = if self.idle_max > self.idle_min {
            self.rng.random_range(self.idle_min..self.idle_max)
        } else {
            self.idle_min
        };
        self.pending = Some(pause);
    }

    fn on_no_route_found(&mut self) {
        self.pending = Some(self.retry_delay);
    }

    fn decide_next_destination(&mut self, dt: f32, grid: &TileGrid) -> Option<Vec3> {
        let remaining = self.pending? - dt;
        if remaining > 0.0 {
            self.pending = Some(remaining);
            return None;
        }

        match self.pick_destination(grid) {
            Some(tile) => {
                self.pending = None;
                Some(tile_center(tile))
            }
            None => {
                self.pending = Some(self.retry_delay);
                None
            }
        }
    }
}

// ============================================================================
// Systems
// ============================================================================

/// Forward locomotion notifications to the owning agent's policy.
fn dispatch_notifications(
    mut completed: MessageReader<RouteCompleted>,
    mut failed: MessageReader<NoRouteFound>,
    mut query: Query<&mut Agent>,
) {
    for msg in completed.read() {
        if let Ok(mut agent) = query.get_mut(msg.entity) {
            agent.policy.on_route_completed();
        }
    }
    for msg in failed.read() {
        if let Ok(mut agent) = query.get_mut(msg.entity) {
            agent.policy.on_no_route_found();
        }
    }
}

/// Tick every policy and turn its decisions into move commands.
fn drive_agents(
    time: Res<Time>,
    grid: Res<TileGrid>,
    mut query: Query<(Entity, &mut Agent)>,
    mut moves: MessageWriter<MoveCommand>,
) {
    let dt = time.delta_secs();
    if !dt.is_finite() || dt <= 0.0 {
        return;
    }

    for (entity, mut agent) in query.iter_mut() {
        if let Some(destination) = agent.policy.decide_next_destination(dt, &grid) {
            moves.write(MoveCommand { entity, destination });
        }
    }
}

pub struct AgentPlugin;

impl Plugin for AgentPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (dispatch_notifications, drive_agents)
                .chain()
                .in_set(NavSet::Decide),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::grid::Occupant;

    fn decide_until_some(policy: &mut WanderPolicy, grid: &TileGrid, dt: f32, max_frames: usize) -> Option<Vec3> {
        for _ in 0..max_frames {
            if let Some(dest) = policy.decide_next_destination(dt, grid) {
                return Some(dest);
            }
        }
        None
    }

    #[test]
    fn same_seed_same_destinations() {
        let grid = TileGrid::new(12, 12);
        let mut a = WanderPolicy::new(99, 0.5, 2.0, 1.0);
        let mut b = WanderPolicy::new(99, 0.5, 2.0, 1.0);

        for _ in 0..5 {
            let da = decide_until_some(&mut a, &grid, 0.1, 1000).unwrap();
            let db = decide_until_some(&mut b, &grid, 0.1, 1000).unwrap();
            assert_eq!(da, db);
            a.on_route_completed();
            b.on_route_completed();
        }
    }

    #[test]
    fn destinations_avoid_occupied_tiles() {
        let mut grid = TileGrid::new(3, 3);
        // Occupy everything except (1, 1).
        for x in 0..3 {
            for y in 0..3 {
                if (x, y) != (1, 1) {
                    grid.place(IVec2::new(x, y), Occupant::solid("Tree"));
                }
            }
        }

        let mut policy = WanderPolicy::new(5, 0.0, 0.0, 1.0);
        let dest = decide_until_some(&mut policy, &grid, 0.1, 1000).unwrap();
        assert_eq!(dest, tile_center(IVec2::new(1, 1)));
    }

    #[test]
    fn failure_waits_for_retry_delay() {
        let grid = TileGrid::new(8, 8);
        let mut policy = WanderPolicy::new(1, 0.5, 2.0, 1.0);

        // Consume the initial decision, then report failure.
        assert!(decide_until_some(&mut policy, &grid, 0.1, 1000).is_some());
        policy.on_no_route_found();

        // Nothing for the first ~1.0s of frames...
        for _ in 0..9 {
            assert!(policy.decide_next_destination(0.1, &grid).is_none());
        }
        // ...then a fresh destination.
        assert!(decide_until_some(&mut policy, &grid, 0.1, 5).is_some());
    }

    #[test]
    fn player_policy_never_decides() {
        let grid = TileGrid::new(8, 8);
        let mut policy = PlayerPolicy;
        policy.on_route_completed();
        policy.on_no_route_found();
        assert!(policy.decide_next_destination(0.1, &grid).is_none());
    }
}
