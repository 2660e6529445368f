//! Logging setup utilities for the Kokuban binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Both the library crate and the binary are enabled at `default_log_level`.
/// The filter can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `crate_name` - The library crate whose spans should be enabled (e.g., "kokuban_server")
/// * `binary_name` - The name of the binary (e.g., "kokuban_server", "kokuban_watcher")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use kokuban_shared::logger::setup_logger;
///
/// setup_logger("kokuban_server", "kokuban_server", "debug");
/// ```
pub fn setup_logger(crate_name: &str, binary_name: &str, default_log_level: &str) {
    let directives = default_directives(crate_name, binary_name, default_log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| directives.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn default_directives(crate_name: &str, binary_name: &str, level: &str) -> String {
    let crate_name = crate_name.replace('-', "_");
    let binary_name = binary_name.replace('-', "_");
    if crate_name == binary_name {
        format!("{crate_name}={level},tower_http={level}")
    } else {
        format!("{crate_name}={level},{binary_name}={level},tower_http={level}")
    }
}
