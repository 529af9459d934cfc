//! Environment for the todo reducer.
//!
//! Each method describes one remote call as an [`Effect`]. Failures are
//! caught here, at the call site: logged, counted, and reported back as
//! [`TodoAction::RequestFailed`]. Nothing retries.

use crate::api::TodoApi;
use crate::error::ApiError;
use crate::types::{NewTodo, Operation, TodoAction, TodoId, TodoPatch};
use std::sync::Arc;
use todo_sync_core::{async_effect, effect::Effect};

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// REST API client
    pub api: Arc<dyn TodoApi>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(api: Arc<dyn TodoApi>) -> Self {
        Self { api }
    }

    /// `GET /todos`, replacing the list on success
    pub fn fetch_todos(&self) -> Effect<TodoAction> {
        let api = Arc::clone(&self.api);
        async_effect! {
            match api.list().await {
                Ok(todos) => {
                    tracing::debug!(count = todos.len(), "Fetched todos");
                    Some(TodoAction::TodosLoaded { todos })
                },
                Err(error) => Some(request_failed(Operation::Load, None, &error)),
            }
        }
    }

    /// `POST /todos`, appending the created record on success
    pub fn create_todo(&self, todo: NewTodo) -> Effect<TodoAction> {
        let api = Arc::clone(&self.api);
        async_effect! {
            match api.create(todo).await {
                Ok(todo) => {
                    tracing::debug!(id = %todo.id, "Created todo");
                    Some(TodoAction::TodoCreated { todo })
                },
                Err(error) => Some(request_failed(Operation::Create, None, &error)),
            }
        }
    }

    /// `PUT /todos/{id}` for a toggle or a saved edit
    ///
    /// `operation` picks the success action.
    pub fn update_todo(&self, operation: Operation, id: TodoId, patch: TodoPatch) -> Effect<TodoAction> {
        let api = Arc::clone(&self.api);
        async_effect! {
            match api.update(id, patch).await {
                Ok(()) if operation == Operation::SaveEdit => {
                    Some(TodoAction::EditPersisted { id })
                },
                Ok(()) => Some(TodoAction::CompletionPersisted { id }),
                Err(error) => Some(request_failed(operation, Some(id), &error)),
            }
        }
    }

    /// `DELETE /todos/{id}`
    pub fn delete_todo(&self, id: TodoId) -> Effect<TodoAction> {
        let api = Arc::clone(&self.api);
        async_effect! {
            match api.delete(id).await {
                Ok(()) => Some(TodoAction::TodoDeleted { id }),
                Err(error) => Some(request_failed(Operation::Delete, Some(id), &error)),
            }
        }
    }
}

/// Log and count a failed call, then describe it as an action
fn request_failed(operation: Operation, id: Option<TodoId>, error: &ApiError) -> TodoAction {
    match id {
        Some(id) => tracing::warn!(operation = %operation, id = %id, error = %error, "Todo request failed"),
        None => tracing::warn!(operation = %operation, error = %error, "Todo request failed"),
    }
    metrics::counter!("todo_api.requests.failed", "operation" => operation.as_str()).increment(1);

    TodoAction::RequestFailed {
        operation,
        error: error.to_string(),
    }
}
