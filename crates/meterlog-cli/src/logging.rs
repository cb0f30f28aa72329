//! Logging setup
//!
//! Logging is off unless METERLOG_LOG is set (to a level such as `debug`).
//! Output goes to a file so it never mixes with command output or the TUI.

use std::fs::OpenOptions;

use meterlog_core::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log level
const LOG_ENV: &str = "METERLOG_LOG";

/// Target prefix of events from this binary (`meterlog`, not the package name)
const CLI_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Initialize file-based logging
///
/// Logs to `config.log_file` or `{data_dir}/debug.log`.
pub fn init(config: &Config) {
    let Ok(log_level) = std::env::var(LOG_ENV) else {
        return;
    };

    let log_path = config.log_path();

    let log_file = match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = build_filter(&log_level);

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("Logging initialized to {:?}", log_path);
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::new(format!("meterlog_core={},{}={}", level, CLI_TARGET, level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing::{debug, warn};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(level: &str, emit: impl FnOnce()) -> String {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(build_filter(level))
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, emit);

        let bytes = buf.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_cli_events_pass_filter() {
        let logged = capture("debug", || warn!("viewer could not be opened"));
        assert!(logged.contains("viewer could not be opened"));
    }

    #[test]
    fn test_level_and_foreign_targets_are_filtered() {
        let logged = capture("warn", || {
            debug!("too verbose");
            warn!(target: "crossterm", "not ours");
        });
        assert!(logged.is_empty());
    }
}
