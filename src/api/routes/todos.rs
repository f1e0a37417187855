//! The set of todo items: `GET /getData`, `POST /postData`, and `DELETE /deleteData/:id`.

use axum::{extract::State, http::StatusCode, Json};
use axum_macros::debug_handler;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::info;

use crate::{
    api::{self, validation::todo_required, Body, Path, Response},
    todo::{self, Todo},
    AppState,
};

/// Lists every todo.
///
/// # Errors
///
/// See [`crate::api::Error`].
#[debug_handler]
pub async fn get(State(state): State<AppState>) -> Response<Vec<Todo>> {
    let todos = todo::list(&state.db_pool).await?;

    info!(count = todos.len(), "Listed todos");

    Ok((StatusCode::OK, Json(todos)))
}

/// A `POST` request body for `/postData`.
#[derive(Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct PostRequest {
    /// The task description. Numbers and booleans are accepted in their text form.
    #[serde(default, deserialize_with = "deserialize_todo")]
    pub todo: Option<String>,
}

/// Deserializes a `todo` field from a string, number, boolean, or `null`.
///
/// # Errors
///
/// Fails if the input is an array or object.
fn deserialize_todo<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(todo)) => Ok(Some(todo)),
        Some(Value::Number(todo)) => Ok(Some(todo.to_string())),
        Some(Value::Bool(todo)) => Ok(Some(todo.to_string())),
        Some(Value::Array(_) | Value::Object(_)) => {
            Err(de::Error::custom("expected `todo` to be text"))
        }
    }
}

/// Creates a todo, returning the created row.
///
/// # Errors
///
/// See [`crate::api::Error`].
#[debug_handler]
pub async fn post(
    State(state): State<AppState>,
    Body(body): Body<PostRequest>,
) -> Response<Todo> {
    let text = if state.validate_todo {
        Some(todo_required(body.todo)?.into_inner())
    } else {
        body.todo
    };

    let todo = todo::create(&state.db_pool, text.as_deref()).await?;

    info!(id = todo.id, "Created todo");

    Ok((StatusCode::OK, Json(todo)))
}

/// A `DELETE` response body for `/deleteData/:id`.
#[derive(Serialize, Clone, PartialEq, Eq, Debug)]
pub struct DeleteResponse {
    /// Confirmation that the todo was deleted.
    pub message: &'static str,
}

/// Deletes the todo with the ID in the URI path.
///
/// # Errors
///
/// See [`crate::api::Error`].
#[debug_handler]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Response<DeleteResponse> {
    let Some(deleted) = todo::delete(&state.db_pool, id).await? else {
        return Err(api::Error::TodoNotFound);
    };

    info!(id = deleted.id, todo = ?deleted.todo, "Deleted todo");

    Ok((
        StatusCode::OK,
        Json(DeleteResponse {
            message: "Todo deleted successfully.",
        }),
    ))
}
