//! Route handlers for `/`.

/// The greeting sent for `GET /`.
pub const GREETING: &str = "POST ms. Hello World!";

/// Route handler for `GET /`.
pub async fn get() -> &'static str {
    GREETING
}
