use bevy::prelude::*;
use bevy_common_assets::ron::RonAssetPlugin;
use serde::{Deserialize, Serialize};

/// Static configuration loaded once at startup. These values define the world
/// extents and per-agent tuning applied at spawn time; changing them mid-run
/// would invalidate routes that are already being followed.
#[derive(Resource, Deserialize, Serialize, Clone, Debug)]
pub struct InitialConfig {
    pub grid_width: i32,
    pub grid_height: i32,

    pub player_move_speed: f32,
    pub player_rotation_speed: f32,
    pub wander_move_speed: f32,
    pub wander_rotation_speed: f32,

    // Wandering agents draw idle pauses and destinations from a seeded
    // generator so runs are reproducible.
    pub wander_seed: u64,
    pub wander_retry_delay: f32,
    pub wander_idle_min: f32,
    pub wander_idle_max: f32,
}

/// Runtime configuration that can be hot-reloaded while the simulation runs.
/// Jump tuning only affects the shape of the arc, never which routes exist.
#[derive(Deserialize, Serialize, Asset, TypePath, Clone, Debug)]
pub struct GameConfig {
    pub jump_height: f32,
    pub jump_duration: f32,

    pub pose_log_interval: f32,
}

#[derive(Resource)]
pub struct GameConfigHandle(pub Handle<GameConfig>);

pub struct GameConfigPlugin;

impl Plugin for GameConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RonAssetPlugin::<GameConfig>::new(&["game_config.ron"]))
           .add_systems(Startup, (load_initial_config, setup_runtime_config).chain());
    }
}

/// Load static initial configuration synchronously at startup.
/// This must complete before the world and its agents are spawned.
pub(crate) fn load_initial_config(mut commands: Commands) {
    let initial_config_path = "assets/initial_config.ron";

    match std::fs::read_to_string(initial_config_path) {
        Ok(contents) => {
            match ron::from_str::<InitialConfig>(&contents) {
                Ok(config) => {
                    info!("Loaded initial config from {}", initial_config_path);
                    commands.insert_resource(config);
                }
                Err(e) => {
                    error!("Failed to parse initial config: {}", e);
                    error!("Using default InitialConfig");
                    commands.insert_resource(InitialConfig::default());
                }
            }
        }
        Err(e) => {
            error!("Failed to read {}: {}", initial_config_path, e);
            error!("Using default InitialConfig");
            commands.insert_resource(InitialConfig::default());
        }
    }
}

/// Load runtime configuration asynchronously (can be hot-reloaded).
pub(crate) fn setup_runtime_config(mut commands: Commands, asset_server: Res<AssetServer>) {
    let handle = asset_server.load("game_config.ron");
    commands.insert_resource(GameConfigHandle(handle));
}

impl Default for InitialConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            player_move_speed: 3.0,
            player_rotation_speed: 10.0,
            wander_move_speed: 1.5,
            wander_rotation_speed: 5.0,
            wander_seed: 7,
            wander_retry_delay: 1.0,
            wander_idle_min: 0.5,
            wander_idle_max: 3.0,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            jump_height: 1.0,
            jump_duration: 0.5,
            pose_log_interval: 1.0,
        }
    }
}
