use bevy::prelude::*;
use bevy::log::LogPlugin;
use bevy::window::WindowResolution;

use starfall::game::GamePlugin;

use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_DIR: &str = "logs";
const LOG_PREFIX: &str = "starfall";
const LOGS_TO_KEEP: usize = 25;

/// Install a subscriber writing to a fresh timestamped file and to stdout.
/// Returns the log file path.
fn setup_file_logging() -> PathBuf {
    let log_dir = PathBuf::from(LOG_DIR);
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("Failed to create {}: {}", log_dir.display(), e);
    }

    prune_old_logs(&log_dir, LOGS_TO_KEEP);

    let log_filename = format!("{}_{}.log", LOG_PREFIX, chrono::Local::now().format("%Y%m%d_%H%M%S"));
    let log_path = log_dir.join(&log_filename);

    // One file per run
    let file_appender = RollingFileAppender::new(Rotation::NEVER, &log_dir, &log_filename);

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wgpu=error,bevy_render=info,starfall=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    log_path
}

/// Delete the oldest `starfall*.log` files beyond `keep`.
fn prune_old_logs(log_dir: &Path, keep: usize) {
    let Ok(entries) = fs::read_dir(log_dir) else { return };

    let mut logs: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(LOG_PREFIX) && name.ends_with(".log"))
        })
        .collect();

    if logs.len() <= keep {
        return;
    }

    // Oldest first
    logs.sort_by_key(|e| e.metadata().ok().and_then(|m| m.modified().ok()));
    for entry in logs.iter().take(logs.len() - keep) {
        let _ = fs::remove_file(entry.path());
    }
}

fn main() {
    let log_file = setup_file_logging();
    println!("Starfall: logging to {}", log_file.display());

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Starfall".into(),
                resolution: WindowResolution::new(1280, 720),
                resizable: true,
                ..default()
            }),
            ..default()
        }).build().disable::<LogPlugin>()) // Subscriber installed above
        .add_plugins(GamePlugin)
        .run();
}
