use bevy::prelude::*;

use bevy::app::ScheduleRunnerPlugin;
use std::time::Duration;

use wayfarer::game::agent::PlayerControlled;
use wayfarer::game::config::{GameConfig, GameConfigHandle};
use wayfarer::game::locomotion::{Locomotion, MoveCommand, NoRouteFound, RouteCompleted, StepCommand};
use wayfarer::game::grid::tile_center;
use wayfarer::game::GamePlugin;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use std::fs;
use std::path::PathBuf;

fn setup_file_logging() -> String {
    // Create logs directory if it doesn't exist
    let log_dir = PathBuf::from("logs");
    if !log_dir.exists() {
        fs::create_dir_all(&log_dir).expect("Failed to create logs directory");
    }

    // Clean up old log files, keeping only the last 25
    cleanup_old_logs(&log_dir, 25);

    // Generate timestamped filename
    let now = chrono::Local::now();
    let log_filename = format!("wayfarer_{}.log", now.format("%Y%m%d_%H%M%S"));
    let log_file_path = log_dir.join(&log_filename);
    let log_path_str = log_file_path.to_string_lossy().to_string();

    let file_appender = RollingFileAppender::new(
        Rotation::NEVER, // Don't rotate during a single run
        &log_dir,
        &log_filename,
    );

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false); // No ANSI colors in file

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bevy_ecs=info,wayfarer=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    log_path_str
}

fn cleanup_old_logs(log_dir: &PathBuf, keep_count: usize) {
    if let Ok(entries) = fs::read_dir(log_dir) {
        let mut log_files: Vec<_> = entries
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(|s| s.starts_with("wayfarer") && s.ends_with(".log"))
                    .unwrap_or(false)
            })
            .collect();

        // Sort by modified time (oldest first)
        log_files.sort_by_key(|e| e.metadata().ok().and_then(|m| m.modified().ok()));

        if log_files.len() > keep_count {
            for file in log_files.iter().take(log_files.len() - keep_count) {
                let _ = fs::remove_file(file.path());
            }
        }
    }
}

fn main() {
    let log_file = setup_file_logging();

    println!("Wayfarer demo - logging to {}", log_file);

    App::new()
        .add_plugins(
            MinimalPlugins
                .set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / 60.0))),
        )
        .add_plugins(AssetPlugin::default())
        .add_plugins(GamePlugin)
        .add_systems(
            Update,
            (drive_demo_script, log_poses, log_notifications, exit_when_done),
        )
        .run();
}

/// Scripted stand-in for the excluded input layer: walk the player across
/// the map, replace the route mid-walk, then take one manual step.
fn drive_demo_script(
    time: Res<Time>,
    mut stage: Local<usize>,
    player: Query<Entity, With<PlayerControlled>>,
    mut moves: MessageWriter<MoveCommand>,
    mut steps: MessageWriter<StepCommand>,
) {
    let Ok(entity) = player.single() else { return };
    let t = time.elapsed_secs();

    match *stage {
        0 if t >= 0.5 => {
            info!("[DEMO] walk across the rock line");
            moves.write(MoveCommand { entity, destination: tile_center(IVec2::new(8, 5)) });
            *stage = 1;
        }
        1 if t >= 5.0 => {
            info!("[DEMO] change of plans mid-route");
            moves.write(MoveCommand { entity, destination: tile_center(IVec2::new(14, 12)) });
            *stage = 2;
        }
        2 if t >= 13.0 => {
            info!("[DEMO] one manual sidestep");
            steps.write(StepCommand { entity, direction: Vec3::new(1.0, 0.0, 0.0) });
            *stage = 3;
        }
        _ => {}
    }
}

fn log_poses(
    time: Res<Time>,
    mut last: Local<f32>,
    config_handle: Res<GameConfigHandle>,
    game_configs: Res<Assets<GameConfig>>,
    query: Query<(&Name, &Locomotion)>,
) {
    let interval = game_configs
        .get(&config_handle.0)
        .map(|c| c.pose_log_interval)
        .unwrap_or(1.0);

    if time.elapsed_secs() - *last < interval {
        return;
    }
    *last = time.elapsed_secs();

    for (name, locomotion) in query.iter() {
        let p = locomotion.position();
        info!(
            "[POSE] {}: ({:.2}, {:.2}) facing {:.2} rad, lift {:.2}{}",
            name,
            p.x,
            p.z,
            locomotion.facing(),
            locomotion.vertical_offset(),
            if locomotion.is_moving() { ", moving" } else { "" }
        );
    }
}

fn log_notifications(
    mut completed: MessageReader<RouteCompleted>,
    mut failed: MessageReader<NoRouteFound>,
    names: Query<&Name>,
) {
    for msg in completed.read() {
        let name = names.get(msg.entity).map(|n| n.as_str()).unwrap_or("?");
        info!("[NOTIFY] {} reached its destination", name);
    }
    for msg in failed.read() {
        let name = names.get(msg.entity).map(|n| n.as_str()).unwrap_or("?");
        info!("[NOTIFY] {} found no route", name);
    }
}

fn exit_when_done(time: Res<Time>, mut exit: MessageWriter<AppExit>) {
    if time.elapsed_secs() > 16.0 {
        exit.write(AppExit::Success);
    }
}
