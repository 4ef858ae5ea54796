use bevy::prelude::*;

pub mod agent;
pub mod config;
pub mod grid;
pub mod locomotion;
pub mod pathfinding;

use agent::{Agent, AgentPlugin, PlayerControlled, PlayerPolicy, WanderPolicy};
use config::{GameConfig, GameConfigHandle, GameConfigPlugin, InitialConfig};
use grid::{Occupant, TileGrid};
use locomotion::{Locomotion, LocomotionPlugin, MotionTuning};
use pathfinding::PathfindingPlugin;

/// Frame phases, chained: policies decide, the planner installs routes,
/// locomotion advances.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum NavSet {
    Decide,
    Plan,
    Advance,
}

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            GameConfigPlugin,
            PathfindingPlugin,
            LocomotionPlugin,
            AgentPlugin,
        ))
        .add_systems(Startup, setup_world.after(config::load_initial_config))
        .add_systems(Update, sync_motion_tuning);
    }
}

/// Build the demo world: a small grid with a handful of occupants, one
/// player-controlled agent and two wanderers. Anything beyond this lives in
/// outer layers; the core only consumes the grid.
fn setup_world(mut commands: Commands, initial: Res<InitialConfig>) {
    let mut grid = TileGrid::new(initial.grid_width, initial.grid_height);

    let scenery = [
        (IVec2::new(4, 5), Occupant::solid("Tree")),
        (IVec2::new(5, 5), Occupant::solid("Tree")),
        (IVec2::new(10, 7), Occupant::solid("Bush")),
        (IVec2::new(6, 5), Occupant::hoppable("Rock")),
        (IVec2::new(12, 12), Occupant::hoppable("Rock")),
    ];
    for (tile, occupant) in scenery {
        if grid.in_bounds(tile) {
            grid.place(tile, occupant);
        }
    }

    info!("World ready: {}x{} tiles", grid.width, grid.height);
    commands.insert_resource(grid);

    commands.spawn((
        Name::new("player"),
        PlayerControlled,
        Locomotion::at_tile(
            IVec2::new(1, 5),
            initial.player_move_speed,
            initial.player_rotation_speed,
        ),
        Agent::new(PlayerPolicy),
    ));

    for (i, tile) in [IVec2::new(8, 8), IVec2::new(14, 3)].into_iter().enumerate() {
        commands.spawn((
            Name::new(format!("wanderer-{i}")),
            Locomotion::at_tile(
                tile,
                initial.wander_move_speed,
                initial.wander_rotation_speed,
            ),
            Agent::new(WanderPolicy::new(
                initial.wander_seed + i as u64,
                initial.wander_idle_min,
                initial.wander_idle_max,
                initial.wander_retry_delay,
            )),
        ));
    }
}

/// Mirror the hot-reloadable jump tuning into the resource locomotion reads.
fn sync_motion_tuning(
    config_handle: Res<GameConfigHandle>,
    game_configs: Res<Assets<GameConfig>>,
    mut tuning: ResMut<MotionTuning>,
) {
    let Some(config) = game_configs.get(&config_handle.0) else { return };
    tuning.jump_height = config.jump_height;
    tuning.jump_duration = config.jump_duration;
}
