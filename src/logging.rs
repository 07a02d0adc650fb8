// File: ./src/logging.rs
// The terminal belongs to the UI, so tracing output goes to a file.
use std::fs::OpenOptions;
use std::path::Path;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Installs a file-backed subscriber. Returns `false` (and logs nothing) when the
/// file cannot be opened or a global subscriber is already set.
pub fn init(log_path: Option<&Path>) -> bool {
    let Some(path) = log_path else {
        return false;
    };
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return false;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let layer = fmt::layer()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .is_ok()
}
