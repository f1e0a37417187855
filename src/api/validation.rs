//! Preconditions checked on API request bodies before any query runs.

use crate::{api::Error, todo::TodoText};

/// Requires a todo's text to be present and nonempty.
///
/// # Errors
///
/// Returns [`Error::TodoRequired`] if the text is absent or empty.
pub fn todo_required(todo: Option<String>) -> Result<TodoText, Error> {
    todo.and_then(|todo| TodoText::try_from(todo).ok())
        .ok_or(Error::TodoRequired)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_or_empty_todo_is_rejected() {
        for todo in [None, Some(String::new())] {
            assert!(
                matches!(todo_required(todo), Err(Error::TodoRequired)),
                "todo should be required"
            );
        }
    }

    #[test]
    fn nonempty_todo_passes() -> anyhow::Result<()> {
        let text = todo_required(Some("buy milk".into()))?;

        assert_eq!(text.as_str(), "buy milk");

        Ok(())
    }
}
