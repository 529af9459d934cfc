//! The list store: one owned state, driven only through its operations.
//!
//! Every method sends one action into the underlying [`Store`] and returns
//! the [`EffectHandle`] for the remote call it started, if any. Awaiting
//! the handle waits until the server answered and the answer was reduced.
//! Dropping it lets the call finish in the background.

use crate::api::TodoApi;
use crate::environment::TodoEnvironment;
use crate::filter::FilteredTodos;
use crate::reducer::TodoReducer;
use crate::types::{Todo, TodoAction, TodoId, TodoListState};
use std::sync::Arc;
use std::time::Duration;
use todo_sync_runtime::{EffectHandle, Store, error::StoreError};
use tokio::sync::broadcast;

/// Runtime store specialised to the todo list
pub type TodoStore = Store<TodoListState, TodoAction, TodoEnvironment, TodoReducer>;

/// Result of a list store operation
pub type SendResult = Result<EffectHandle, StoreError>;

/// Owner of the todo list state
#[derive(Clone)]
pub struct ListStore {
    store: TodoStore,
}

impl ListStore {
    /// Create an empty list store talking to `api`
    #[must_use]
    pub fn new(api: Arc<dyn TodoApi>) -> Self {
        Self::with_state(TodoListState::new(), api)
    }

    /// Create a list store starting from `state`
    #[must_use]
    pub fn with_state(state: TodoListState, api: Arc<dyn TodoApi>) -> Self {
        Self {
            store: Store::new(state, TodoReducer::new(), TodoEnvironment::new(api)),
        }
    }

    /// Fetch the full list, replacing local items when it arrives
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once shutdown has begun.
    pub async fn load(&self) -> SendResult {
        self.send(TodoAction::Load).await
    }

    /// Create a todo; it appears locally once the server assigned its id
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once shutdown has begun.
    pub async fn add(&self, name: impl Into<String>, description: impl Into<String>) -> SendResult {
        self.send(TodoAction::AddTodo {
            name: name.into(),
            description: description.into(),
        })
        .await
    }

    /// Replace the create form contents
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once shutdown has begun.
    pub async fn update_draft(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> SendResult {
        self.send(TodoAction::UpdateDraft {
            name: name.into(),
            description: description.into(),
        })
        .await
    }

    /// Create a todo from the current draft
    ///
    /// The draft is cleared when the server confirms.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once shutdown has begun.
    pub async fn submit_draft(&self) -> SendResult {
        let draft = self.store.state(|s| s.draft.clone()).await;
        self.add(draft.name, draft.description).await
    }

    /// Flip `completed` locally and persist the full record
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once shutdown has begun.
    pub async fn toggle_complete(&self, id: TodoId) -> SendResult {
        self.send(TodoAction::ToggleComplete { id }).await
    }

    /// Put `id` into edit mode, seeding the buffer from its labels
    ///
    /// Any other unsaved edit is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once shutdown has begun.
    pub async fn edit(&self, id: TodoId) -> SendResult {
        self.send(TodoAction::StartEdit { id }).await
    }

    /// Change the name in the edit buffer
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once shutdown has begun.
    pub async fn set_edit_name(&self, value: impl Into<String>) -> SendResult {
        self.send(TodoAction::SetEditName { value: value.into() }).await
    }

    /// Change the description in the edit buffer
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once shutdown has begun.
    pub async fn set_edit_description(&self, value: impl Into<String>) -> SendResult {
        self.send(TodoAction::SetEditDescription { value: value.into() })
            .await
    }

    /// Leave edit mode without saving
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once shutdown has begun.
    pub async fn cancel_edit(&self) -> SendResult {
        self.send(TodoAction::CancelEdit).await
    }

    /// Apply the edit buffer to `id` and persist it
    ///
    /// Edit mode ends when the server confirms.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once shutdown has begun.
    pub async fn save_edit(&self, id: TodoId) -> SendResult {
        self.send(TodoAction::SaveEdit { id }).await
    }

    /// Remove `id` locally and on the server
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once shutdown has begun.
    pub async fn delete(&self, id: TodoId) -> SendResult {
        self.send(TodoAction::DeleteTodo { id }).await
    }

    /// Change the search query
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once shutdown has begun.
    pub async fn set_search(&self, query: impl Into<String>) -> SendResult {
        self.send(TodoAction::SetSearch { query: query.into() }).await
    }

    /// Send any action
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once shutdown has begun.
    pub async fn send(&self, action: TodoAction) -> SendResult {
        self.store.send(action).await
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> TodoListState {
        self.store.state(Clone::clone).await
    }

    /// Items the view shows for the current search query
    pub async fn visible(&self) -> Vec<Todo> {
        self.render(|_, view| view.items().iter().map(|&t| t.clone()).collect())
            .await
    }

    /// Read state and its filtered view together
    pub async fn render<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&TodoListState, FilteredTodos<'_>) -> T,
    {
        self.store
            .state(|state| f(state, FilteredTodos::new(&state.todos, &state.search)))
            .await
    }

    /// Results of remote calls as they are reduced
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TodoAction> {
        self.store.subscribe_actions()
    }

    /// Remote calls still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.store.pending_effects()
    }

    /// Stop accepting operations and wait for in-flight calls
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if calls are still running
    /// after `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        self.store.shutdown(timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::InMemoryTodoApi;

    #[tokio::test]
    async fn draft_round_trip_through_submit() {
        let api = Arc::new(InMemoryTodoApi::new());
        let store = ListStore::new(api.clone());

        store.update_draft("X", "Y").await.unwrap();
        assert_eq!(store.snapshot().await.draft.name, "X");

        store.submit_draft().await.unwrap().wait().await;

        let state = store.snapshot().await;
        assert!(state.draft.is_empty());
        assert_eq!(state.todos.len(), 1);
        assert_eq!(api.todos(), state.todos);
    }

    #[tokio::test]
    async fn render_sees_query_and_items() {
        let api = Arc::new(InMemoryTodoApi::new());
        let store = ListStore::with_state(
            TodoListState::with_todos(vec![
                Todo::new(TodoId::new(1), "Pizza", ""),
                Todo::new(TodoId::new(2), "Salad", ""),
            ]),
            api,
        );

        store.set_search("SAL").await.unwrap();

        let (query, names) = store
            .render(|state, view| {
                (
                    state.search.clone(),
                    view.items().iter().map(|t| t.name.clone()).collect::<Vec<_>>(),
                )
            })
            .await;
        assert_eq!(query, "SAL");
        assert_eq!(names, vec!["Salad"]);
    }
}
