//! The todo entity and the SQL statements that operate on the `todos` table.
//!
//! The table is expected to already exist as `todos(id SERIAL PRIMARY KEY, todo TEXT)`.

use derive_more::derive::{AsRef, Deref, Display};
use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;

/// A row of the `todos` table.
#[derive(sqlx::FromRow, Serialize, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Todo {
    /// The identifier the database assigned on insert.
    pub id: i32,

    /// The task description. The column is nullable, so rows written without validation may lack
    /// one.
    pub todo: Option<String>,
}

/// A task description that is guaranteed to be nonempty.
#[derive(Deref, AsRef, Display, Clone, PartialEq, Eq, Hash, Debug)]
#[as_ref(forward)]
pub struct TodoText(String);

impl TodoText {
    /// Consumes the [`TodoText`], returning the wrapped [`String`].
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// An error constructing a [`TodoText`].
#[derive(Error, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[error("todo text must not be empty")]
pub struct EmptyTodoText;

impl TryFrom<String> for TodoText {
    type Error = EmptyTodoText;

    fn try_from(string: String) -> Result<Self, Self::Error> {
        if string.is_empty() {
            Err(EmptyTodoText)
        } else {
            Ok(Self(string))
        }
    }
}

/// Selects every todo in storage order.
///
/// # Errors
///
/// Fails if the query fails.
pub async fn list(db_pool: &PgPool) -> sqlx::Result<Vec<Todo>> {
    sqlx::query_as::<_, Todo>("SELECT id, todo FROM todos")
        .fetch_all(db_pool)
        .await
}

/// Inserts a todo with the given text, returning the created row.
///
/// # Errors
///
/// Fails if the query fails.
pub async fn create(db_pool: &PgPool, text: Option<&str>) -> sqlx::Result<Todo> {
    sqlx::query_as::<_, Todo>("INSERT INTO todos (todo) VALUES ($1) RETURNING id, todo")
        .bind(text)
        .fetch_one(db_pool)
        .await
}

/// Deletes the todo with the given ID, returning the deleted row if there was one.
///
/// # Errors
///
/// Fails if the query fails.
pub async fn delete(db_pool: &PgPool, id: i32) -> sqlx::Result<Option<Todo>> {
    sqlx::query_as::<_, Todo>("DELETE FROM todos WHERE id = $1 RETURNING id, todo")
        .bind(id)
        .fetch_optional(db_pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_todo_text_is_rejected() {
        TodoText::try_from(String::new()).expect_err("empty text should be rejected");
    }

    #[test]
    fn whitespace_todo_text_is_kept() -> anyhow::Result<()> {
        let text = TodoText::try_from(" ".to_owned())?;

        assert_eq!(text.into_inner(), " ");

        Ok(())
    }

    #[test]
    fn todo_serializes_as_id_and_text() -> anyhow::Result<()> {
        let todo = Todo {
            id: 1,
            todo: Some("buy milk".into()),
        };

        assert_eq!(
            serde_json::to_string(&todo)?,
            r#"{"id":1,"todo":"buy milk"}"#
        );

        Ok(())
    }
}
