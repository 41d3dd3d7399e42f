//! Logging initialization, shared by the library and the `lorawan-mac` binary.

use log::{debug, error, info, log_enabled, warn, Level};

/// Initializes the logger with the `env_logger` crate.
///
/// Respects the standard `RUST_LOG` environment variable; defaults to
/// `info` when unset.
pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Logs an error message.
pub fn log_error(message: &str) {
    if log_enabled!(Level::Error) {
        error!("{message}");
    }
}

/// Logs a warning message.
pub fn log_warn(message: &str) {
    if log_enabled!(Level::Warn) {
        warn!("{message}");
    }
}

/// Logs an informational message.
pub fn log_info(message: &str) {
    if log_enabled!(Level::Info) {
        info!("{message}");
    }
}

/// Logs a debug message.
pub fn log_debug(message: &str) {
    if log_enabled!(Level::Debug) {
        debug!("{message}");
    }
}

/// Throttles a repeated warning so the RX-window scheduler's ~200ms tick
/// doesn't flood the log with an identical line every iteration.
///
/// Tracks the last time a given `key` was logged and only emits again once
/// `min_interval` has elapsed.
pub struct LogThrottle {
    last_logged: std::collections::HashMap<&'static str, std::time::Instant>,
    min_interval: std::time::Duration,
}

impl LogThrottle {
    pub fn new(min_interval: std::time::Duration) -> Self {
        Self {
            last_logged: std::collections::HashMap::new(),
            min_interval,
        }
    }

    /// Returns `true` the first time `key` is seen, or once `min_interval`
    /// has elapsed since the last time it returned `true`.
    pub fn allow(&mut self, key: &'static str) -> bool {
        let now = std::time::Instant::now();
        match self.last_logged.get(key) {
            Some(last) if now.duration_since(*last) < self.min_interval => false,
            _ => {
                self.last_logged.insert(key, now);
                true
            }
        }
    }
}
