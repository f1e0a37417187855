//! Structured logging setup.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// The log filter used if `RUST_LOG` isn't set.
pub const DEFAULT_FILTER: &str = "info,todo_service=debug,tower_http=debug";

/// Installs the global tracing subscriber, filtered by `RUST_LOG`.
///
/// # Errors
///
/// Fails if the default filter is invalid or a global subscriber is already installed.
pub fn init() -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(DEFAULT_FILTER)?,
    };

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
