//! In-memory [`TodoApi`] for tests.
//!
//! Behaves like the companion JSON server: ids are assigned on create,
//! updates merge the sent fields, unknown ids answer 404. Every request is
//! recorded so tests can assert on what went over the wire.

use crate::api::{ApiFuture, TodoApi};
use crate::error::{ApiError, Result};
use crate::types::{NewTodo, Operation, Todo, TodoId, TodoPatch};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A request received by [`InMemoryTodoApi`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedRequest {
    /// `GET /todos`
    List,
    /// `POST /todos`
    Create(NewTodo),
    /// `PUT /todos/{id}`
    Update {
        /// Target id
        id: TodoId,
        /// Body sent
        patch: TodoPatch,
    },
    /// `DELETE /todos/{id}`
    Delete(TodoId),
}

#[derive(Debug, Default)]
struct Inner {
    todos: Vec<Todo>,
    next_id: u64,
    requests: Vec<RecordedRequest>,
    failing: HashSet<Operation>,
}

/// Mock todo server
#[derive(Debug, Clone)]
pub struct InMemoryTodoApi {
    inner: Arc<Mutex<Inner>>,
    latency: Option<Duration>,
}

impl InMemoryTodoApi {
    /// Create an empty mock server
    #[must_use]
    pub fn new() -> Self {
        Self::with_todos(Vec::new())
    }

    /// Create a mock server already holding `todos`
    #[must_use]
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        let next_id = todos.iter().map(|t| t.id.get()).max().unwrap_or(0) + 1;
        Self {
            inner: Arc::new(Mutex::new(Inner {
                todos,
                next_id,
                ..Inner::default()
            })),
            latency: None,
        }
    }

    /// Delay every response by `latency`
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make requests belonging to `operation` fail with a 500
    pub fn fail(&self, operation: Operation) {
        self.lock().failing.insert(operation);
    }

    /// Let requests belonging to `operation` succeed again
    pub fn recover(&self, operation: Operation) {
        self.lock().failing.remove(&operation);
    }

    /// Server-side copy of the list
    #[must_use]
    pub fn todos(&self) -> Vec<Todo> {
        self.lock().todos.clone()
    }

    /// Every request received so far, oldest first
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    // Test inspection only; a poisoned lock still holds usable data
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn handle(&self, operation: Operation, request: RecordedRequest) -> Result<MutexGuard<'_, Inner>> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| ApiError::RequestFailed("Mutex lock failed".into()))?;

        inner.requests.push(request);

        if inner.failing.contains(&operation) {
            return Err(ApiError::Status {
                status: 500,
                message: format!("{operation} is failing"),
            });
        }

        Ok(inner)
    }
}

impl Default for InMemoryTodoApi {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(id: TodoId) -> ApiError {
    ApiError::Status {
        status: 404,
        message: format!("todo {id} not found"),
    }
}

impl TodoApi for InMemoryTodoApi {
    fn list(&self) -> ApiFuture<'_, Vec<Todo>> {
        Box::pin(async move {
            self.simulate_latency().await;
            let inner = self.handle(Operation::Load, RecordedRequest::List)?;
            Ok(inner.todos.clone())
        })
    }

    fn create(&self, todo: NewTodo) -> ApiFuture<'_, Todo> {
        Box::pin(async move {
            self.simulate_latency().await;
            let mut inner = self.handle(Operation::Create, RecordedRequest::Create(todo.clone()))?;

            let created = Todo {
                id: TodoId::new(inner.next_id),
                name: todo.name,
                description: todo.description,
                completed: todo.completed,
            };
            inner.next_id += 1;
            inner.todos.push(created.clone());
            Ok(created)
        })
    }

    fn update(&self, id: TodoId, patch: TodoPatch) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            self.simulate_latency().await;
            // Toggles send the whole record, edits only the labels
            let operation = if patch.completed.is_some() {
                Operation::ToggleComplete
            } else {
                Operation::SaveEdit
            };
            let mut inner = self.handle(
                operation,
                RecordedRequest::Update {
                    id,
                    patch: patch.clone(),
                },
            )?;

            let todo = inner
                .todos
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| not_found(id))?;

            if let Some(name) = patch.name {
                todo.name = name;
            }
            if let Some(description) = patch.description {
                todo.description = description;
            }
            if let Some(completed) = patch.completed {
                todo.completed = completed;
            }
            Ok(())
        })
    }

    fn delete(&self, id: TodoId) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            self.simulate_latency().await;
            let mut inner = self.handle(Operation::Delete, RecordedRequest::Delete(id))?;

            let before = inner.todos.len();
            inner.todos.retain(|t| t.id != id);
            if inner.todos.len() == before {
                return Err(not_found(id));
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn assigns_increasing_ids() {
        let api = InMemoryTodoApi::with_todos(vec![Todo::new(TodoId::new(4), "A", "")]);

        let first = api.create(NewTodo::new("B", "")).await.unwrap();
        let second = api.create(NewTodo::new("C", "")).await.unwrap();

        assert_eq!(first.id, TodoId::new(5));
        assert_eq!(second.id, TodoId::new(6));
        assert_eq!(api.todos().len(), 3);
    }

    #[tokio::test]
    async fn update_merges_sent_fields() {
        let api = InMemoryTodoApi::with_todos(vec![Todo::new(TodoId::new(1), "A", "B")]);

        api.update(
            TodoId::new(1),
            TodoPatch {
                name: Some("N".into()),
                ..TodoPatch::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(api.todos()[0], Todo::new(TodoId::new(1), "N", "B"));
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let api = InMemoryTodoApi::new();

        let err = api.delete(TodoId::new(3)).await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 404, .. }));
        assert_eq!(api.requests(), vec![RecordedRequest::Delete(TodoId::new(3))]);
    }

    #[tokio::test]
    async fn failing_operation_is_recorded_but_not_applied() {
        let api = InMemoryTodoApi::new();
        api.fail(Operation::Create);

        assert!(api.create(NewTodo::new("A", "")).await.is_err());
        assert!(api.todos().is_empty());
        assert_eq!(api.requests().len(), 1);

        api.recover(Operation::Create);
        assert!(api.create(NewTodo::new("A", "")).await.is_ok());
    }
}
