use crate::error::PsvmError;
use chrono::Local;
use std::fs::create_dir_all;
use std::io;
use std::path::Path;
use tracing::metadata::LevelFilter;
use tracing_subscriber::{
    fmt::{self, time::FormatTime},
    prelude::*,
    EnvFilter, Layer,
};

struct CustomTime;

impl FormatTime for CustomTime {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Initialize the tracing system for logging
///
/// # Arguments
///
/// * `level` - The log level to use ("error", "warn", "info", "debug", "trace")
/// * `log_file_path` - Optional path to a log file; stdout is always enabled
pub fn init_logging(level: &str, log_file_path: Option<&str>) -> Result<(), PsvmError> {
    let filter_level = match level.to_lowercase().as_str() {
        "error" => LevelFilter::ERROR,
        "warn" => LevelFilter::WARN,
        "info" => LevelFilter::INFO,
        "debug" => LevelFilter::DEBUG,
        "trace" => LevelFilter::TRACE,
        _ => LevelFilter::INFO,
    };

    // Respect RUST_LOG when set, otherwise use the requested level
    let env_filter = match std::env::var("RUST_LOG") {
        Ok(env_val) => EnvFilter::new(env_val),
        Err(_) => EnvFilter::new(level.to_lowercase()),
    };

    if let Some(log_path) = log_file_path {
        let stdout_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stdout)
            .with_ansi(true)
            .with_timer(CustomTime)
            .with_target(true)
            .with_filter(filter_level);

        let dir = Path::new(log_path).parent().unwrap_or(Path::new(""));
        create_dir_all(dir).map_err(PsvmError::IoError)?;

        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .map_err(PsvmError::IoError)?;

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_timer(CustomTime)
            .with_target(true)
            .with_filter(filter_level);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(stdout_layer)
            .init();
    } else {
        let stdout_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stdout)
            .with_ansi(true)
            .with_timer(CustomTime)
            .with_target(true)
            .with_filter(filter_level);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stdout_layer)
            .init();
    }

    tracing::debug!("Logging initialized at {} level", level.to_uppercase());

    Ok(())
}
