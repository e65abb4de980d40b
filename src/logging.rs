use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "TAGDECK_LOG";

pub fn log_path() -> PathBuf {
    directories::ProjectDirs::from("com", "tagdeck", "tagdeck")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("tagdeck"))
        .join("tagdeck.log")
}

/// Send `tracing` output to the log file. The terminal belongs to the UI,
/// so nothing is written to stdout or stderr.
pub fn init() {
    let path = log_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: cannot open log file {}: {}", path.display(), e);
            return;
        }
    };

    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init();

    if result.is_ok() {
        tracing::info!(version = env!("CARGO_PKG_VERSION"), "logging initialized");
    }
}
