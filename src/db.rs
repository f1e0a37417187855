//! General database handling.

use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::config::DbConfig;

/// Creates the SQLx database pool.
///
/// Connections are opened lazily on first use, so the service can start (and answer requests that
/// don't need the database) while the database is still unreachable. Each query borrows a
/// connection for its own duration and returns it to the pool when done, whether or not it fails.
pub fn initialize(config: &DbConfig) -> PgPool {
    info!(
        host = %config.host,
        port = config.port,
        database = %config.name,
        encoding = %config.encoding,
        max_connections = config.max_connections,
        "Configuring database pool"
    );

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_lazy_with(config.connect_options())
}
