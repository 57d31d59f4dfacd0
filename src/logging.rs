//! Log file setup.
//!
//! The terminal belongs to the UI, so logs go to a file only. The filter
//! comes from `log.level` unless `RUST_LOG` is set.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{self, LogSettings};

/// Resolve where the log file goes, or `None` when logging is off.
pub fn log_path(settings: &LogSettings) -> Option<PathBuf> {
    if !settings.enabled {
        return None;
    }
    settings.file.clone().or_else(config::default_log_path)
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn filter_for(settings: &LogSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Returns the log file path in use.
pub fn init(settings: &LogSettings) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    let Some(path) = log_path(settings) else {
        return Ok(None);
    };

    let file = open_log_file(&path)?;
    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter_for(settings))
        .with(file_layer)
        .try_init()?;

    tracing::info!(path = %path.display(), "logging initialized at level {}", settings.level);
    Ok(Some(path))
}
