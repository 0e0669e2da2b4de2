use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable naming the log file.
pub const LOG_ENV: &str = "SLIDE_PUZZLE_LOG";

/// Initialize tracing with optional file output.
///
/// Logging is off unless `SLIDE_PUZZLE_LOG` names a file, since the terminal
/// front end owns stdout and stderr. The filter comes from `RUST_LOG` and
/// defaults to `info`.
pub fn init_tracing() {
    let Some(log_path) = std::env::var_os(LOG_ENV) else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!(
                "Warning: Failed to open log file {}: {}",
                log_path.to_string_lossy(),
                e
            );
            return;
        }
    };

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
}
