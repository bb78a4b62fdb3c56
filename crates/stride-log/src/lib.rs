//! Structured logging for the stride movement stack.
//!
//! Span-based, filterable logging via the `tracing` ecosystem: console
//! output with uptime timestamps and module paths, plus optional JSON file
//! logging for post-mortem analysis of desync reports. Honors the config
//! system's `log_level` and the `RUST_LOG` environment variable.

use std::path::Path;

use stride_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter: info everywhere, with the chatty per-tick movement
/// target turned down to warn.
const DEFAULT_FILTER: &str = "info,stride_movement=warn";

/// Initialize the tracing subscriber.
///
/// * `log_dir` — optional directory for a JSON log file.
/// * `config` — optional configuration whose `debug.log_level` overrides
///   the default filter. `RUST_LOG` takes precedence over both.
pub fn init_logging(log_dir: Option<&Path>, config: Option<&Config>) {
    let filter_str = match config {
        Some(config) if !config.debug.log_level.is_empty() => config.debug.log_level.clone(),
        _ => DEFAULT_FILTER.to_string(),
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join("stride.log"))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// Create an `EnvFilter` with the default filter string.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}
