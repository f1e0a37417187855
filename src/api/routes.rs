//! All routes for the HTTP API.

use axum::{
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use crate::{
    api::{self, headers},
    config::ApiConfig,
    AppState,
};

pub mod root;
pub mod todos;

/// Builds the API router around an explicitly owned database pool.
pub fn router(db_pool: PgPool, config: ApiConfig) -> Router {
    let state = AppState {
        db_pool,
        validate_todo: config.validate_todo,
    };

    // Each method router gets the same fallback so a known path with the wrong method is a 404
    // like any other unknown route.
    let router = Router::new()
        .route("/", get(root::get).fallback(not_found))
        .route("/getData", get(todos::get).fallback(not_found))
        .route("/postData", post(todos::post).fallback(not_found))
        .route("/deleteData/:id", delete(todos::delete).fallback(not_found))
        .fallback(not_found)
        .with_state(state);

    let router = headers::with_security_headers(router);
    let router = headers::with_cors(router, config.cors_enabled);

    router.layer(TraceLayer::new_for_http())
}

/// The fallback for requests matching no route.
async fn not_found() -> api::Error {
    api::Error::RouteNotFound
}
