//! Logging setup for the Ama binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Log target of the server library crate.
const LIBRARY_TARGET: &str = "ama_server";

/// Initialize the tracing subscriber with the specified default log level.
///
/// The default filter enables `default_log_level` for the server library crate
/// and for the binary itself. `RUST_LOG` overrides it entirely.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "ama_server")
/// * `default_log_level` - The default log level (e.g., "debug", "info")
///
/// # Examples
///
/// ```no_run
/// use ama_shared::logger::setup_logger;
///
/// setup_logger("ama_server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the directive string used when `RUST_LOG` is not set.
///
/// The binary directive is omitted when it names the library crate itself.
fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    let binary = binary_name.replace('-', "_");
    let mut targets = vec![LIBRARY_TARGET];
    if binary != LIBRARY_TARGET {
        targets.push(&binary);
    }
    targets.push("tower_http");

    targets
        .iter()
        .map(|target| format!("{target}={default_log_level}"))
        .collect::<Vec<_>>()
        .join(",")
}
