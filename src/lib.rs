//! A minimal HTTP service exposing CRUD-style endpoints over a Postgres table of todo items.

pub mod api;
pub mod config;
pub mod db;
pub mod telemetry;
pub mod todo;

use sqlx::PgPool;

/// The state shared by all API route handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The database pool, created once at startup.
    pub db_pool: PgPool,

    /// Whether `POST /postData` requires a nonempty `todo` field.
    pub validate_todo: bool,
}
