//! Reducer logic for the todo list.
//!
//! Toggle, save and delete change local state first and then describe the
//! remote call. Create is the exception: the list only grows once the server
//! has returned the record with its id. Failed calls never undo anything.

use crate::environment::TodoEnvironment;
use crate::types::{
    Draft, EditBuffer, EditSession, NewTodo, Operation, Todo, TodoAction, TodoId, TodoListState,
    TodoPatch,
};
use todo_sync_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

/// Effects returned by [`TodoReducer`]
type Effects = SmallVec<[Effect<TodoAction>; 4]>;

/// Reducer for the todo list
#[derive(Clone, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn toggle_complete(state: &mut TodoListState, id: TodoId, env: &TodoEnvironment) -> Effects {
        let Some(todo) = state.get_mut(id) else {
            tracing::debug!(%id, "Toggle ignored: todo not found");
            return SmallVec::new();
        };

        *todo = todo.toggled();
        let record = todo.clone();

        smallvec![env.update_todo(Operation::ToggleComplete, id, TodoPatch::from(record))]
    }

    fn start_edit(state: &mut TodoListState, id: TodoId) {
        let Some(todo) = state.get(id) else {
            tracing::debug!(%id, "Edit ignored: todo not found");
            return;
        };

        if let Some(previous) = state.edit_cursor().filter(|&previous| previous != id) {
            tracing::debug!(%previous, %id, "Abandoning unsaved edit");
        }

        state.editing = Some(EditSession {
            id,
            buffer: EditBuffer::seeded_from(todo),
        });
    }

    fn save_edit(state: &mut TodoListState, id: TodoId, env: &TodoEnvironment) -> Effects {
        let buffer = match &state.editing {
            Some(session) if session.id == id => session.buffer.clone(),
            _ => {
                tracing::debug!(%id, "Save ignored: todo is not in edit mode");
                return SmallVec::new();
            },
        };

        if let Some(todo) = state.get_mut(id) {
            buffer.apply_to(todo);
        }

        smallvec![env.update_todo(Operation::SaveEdit, id, TodoPatch::from(buffer))]
    }

    fn delete(state: &mut TodoListState, id: TodoId, env: &TodoEnvironment) -> Effects {
        state.todos.retain(|todo| todo.id != id);

        if state.is_editing(id) {
            state.editing = None;
        }

        smallvec![env.delete_todo(id)]
    }

    fn todo_created(state: &mut TodoListState, todo: Todo) {
        match state.get_mut(todo.id) {
            Some(existing) => *existing = todo,
            None => state.todos.push(todo),
        }
        state.draft = Draft::default();
    }
}

impl Reducer for TodoReducer {
    type State = TodoListState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            TodoAction::Load => smallvec![env.fetch_todos()],

            TodoAction::UpdateDraft { name, description } => {
                state.draft = Draft { name, description };
                SmallVec::new()
            },

            TodoAction::AddTodo { name, description } => {
                smallvec![env.create_todo(NewTodo::new(name, description))]
            },

            TodoAction::ToggleComplete { id } => Self::toggle_complete(state, id, env),

            TodoAction::StartEdit { id } => {
                Self::start_edit(state, id);
                SmallVec::new()
            },

            TodoAction::SetEditName { value } => {
                if let Some(session) = state.editing.as_mut() {
                    session.buffer.name = value;
                }
                SmallVec::new()
            },

            TodoAction::SetEditDescription { value } => {
                if let Some(session) = state.editing.as_mut() {
                    session.buffer.description = value;
                }
                SmallVec::new()
            },

            TodoAction::CancelEdit => {
                state.editing = None;
                SmallVec::new()
            },

            TodoAction::SaveEdit { id } => Self::save_edit(state, id, env),

            TodoAction::DeleteTodo { id } => Self::delete(state, id, env),

            TodoAction::SetSearch { query } => {
                state.search = query;
                SmallVec::new()
            },

            // ========== Results ==========
            TodoAction::TodosLoaded { todos } => {
                state.todos = todos;
                if let Some(id) = state.edit_cursor().filter(|&id| !state.exists(id)) {
                    tracing::debug!(%id, "Edited todo is gone after reload");
                    state.editing = None;
                }
                SmallVec::new()
            },

            TodoAction::TodoCreated { todo } => {
                Self::todo_created(state, todo);
                SmallVec::new()
            },

            TodoAction::EditPersisted { id } => {
                // The cursor may have moved on to another item meanwhile
                if state.is_editing(id) {
                    state.editing = None;
                }
                SmallVec::new()
            },

            TodoAction::CompletionPersisted { .. }
            | TodoAction::TodoDeleted { .. }
            | TodoAction::RequestFailed { .. } => SmallVec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::InMemoryTodoApi;
    use std::sync::Arc;
    use todo_sync_testing::{ReducerTest, assertions};

    fn create_test_env() -> TodoEnvironment {
        TodoEnvironment::new(Arc::new(InMemoryTodoApi::new()))
    }

    fn id(raw: u64) -> TodoId {
        TodoId::new(raw)
    }

    fn sample_state() -> TodoListState {
        TodoListState::with_todos(vec![
            Todo::new(id(1), "Pizza", "Order from Luigi's"),
            Todo::new(id(2), "Salad", "Greens"),
            Todo::new(id(3), "Laundry", "Whites only"),
        ])
    }

    #[test]
    fn load_requests_list_without_touching_state() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(sample_state())
            .when_action(TodoAction::Load)
            .then_state(|state| assert_eq!(state.count(), 3))
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn reload_without_edited_todo_closes_session() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(sample_state())
            .when_actions([
                TodoAction::StartEdit { id: id(2) },
                TodoAction::TodosLoaded {
                    todos: vec![Todo::new(id(1), "Pizza", "Order from Luigi's")],
                },
            ])
            .then_state(|state| {
                assert!(state.editing.is_none());
                assert_eq!(state.count(), 1);
            })
            .run();
    }

    #[test]
    fn reload_keeps_session_when_edited_todo_survives() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(sample_state())
            .when_actions([
                TodoAction::StartEdit { id: id(3) },
                TodoAction::SetEditName { value: "Ironing".into() },
                TodoAction::TodosLoaded {
                    todos: sample_state().todos,
                },
            ])
            .then_state(|state| {
                let session = state.editing.as_ref().unwrap();
                assert_eq!(session.id, id(3));
                assert_eq!(session.buffer.name, "Ironing");
            })
            .run();
    }

    #[test]
    fn loaded_todos_replace_state_wholesale() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(sample_state())
            .when_action(TodoAction::TodosLoaded {
                todos: vec![Todo::new(id(9), "A", "B")],
            })
            .then_state(|state| {
                assert_eq!(state.todos, vec![Todo::new(id(9), "A", "B")]);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn add_waits_for_server() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(TodoListState::new())
            .when_actions([
                TodoAction::UpdateDraft {
                    name: "X".into(),
                    description: "Y".into(),
                },
                TodoAction::AddTodo {
                    name: "X".into(),
                    description: "Y".into(),
                },
            ])
            .then_state(|state| {
                assert_eq!(state.count(), 0);
                assert_eq!(state.draft.name, "X");
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn created_todo_is_appended_and_draft_cleared() {
        let created = Todo::new(id(5), "X", "Y");
        let expected = created.clone();

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(TodoListState {
                draft: Draft {
                    name: "X".into(),
                    description: "Y".into(),
                },
                ..sample_state()
            })
            .when_action(TodoAction::TodoCreated { todo: created })
            .then_state(move |state| {
                assert_eq!(state.count(), 4);
                assert_eq!(state.todos.last(), Some(&expected));
                assert!(state.draft.is_empty());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn created_todo_with_known_id_is_not_duplicated() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(sample_state())
            .when_action(TodoAction::TodoCreated {
                todo: Todo::new(id(2), "Salad", "Caesar"),
            })
            .then_state(|state| {
                assert_eq!(state.count(), 3);
                assert_eq!(state.todos[1].description, "Caesar");
            })
            .run();
    }

    #[test]
    fn toggle_flips_locally_and_persists() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(sample_state())
            .when_action(TodoAction::ToggleComplete { id: id(2) })
            .then_state(|state| {
                assert!(state.get(id(2)).unwrap().completed);
                assert!(!state.get(id(1)).unwrap().completed);
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn toggle_twice_restores_flag() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(sample_state())
            .when_actions([
                TodoAction::ToggleComplete { id: id(1) },
                TodoAction::ToggleComplete { id: id(1) },
            ])
            .then_state(|state| assert_eq!(state, &sample_state()))
            .run();
    }

    #[test]
    fn toggle_unknown_id_does_nothing() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(sample_state())
            .when_action(TodoAction::ToggleComplete { id: id(42) })
            .then_state(|state| assert_eq!(state, &sample_state()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn start_edit_seeds_buffer() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(sample_state())
            .when_action(TodoAction::StartEdit { id: id(3) })
            .then_state(|state| {
                let session = state.editing.as_ref().unwrap();
                assert_eq!(session.id, id(3));
                assert_eq!(session.buffer.name, "Laundry");
                assert_eq!(session.buffer.description, "Whites only");
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn editing_second_item_discards_first_buffer() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(sample_state())
            .when_actions([
                TodoAction::StartEdit { id: id(1) },
                TodoAction::SetEditName {
                    value: "Calzone".into(),
                },
                TodoAction::StartEdit { id: id(2) },
            ])
            .then_state(|state| {
                let session = state.editing.as_ref().unwrap();
                assert_eq!(session.id, id(2));
                assert_eq!(session.buffer.name, "Salad");
                // Nothing was applied to the abandoned item
                assert_eq!(state.get(id(1)).unwrap().name, "Pizza");
            })
            .run();
    }

    #[test]
    fn start_edit_unknown_id_keeps_current_session() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(sample_state())
            .when_actions([
                TodoAction::StartEdit { id: id(1) },
                TodoAction::StartEdit { id: id(77) },
            ])
            .then_state(|state| assert_eq!(state.edit_cursor(), Some(id(1))))
            .run();
    }

    #[test]
    fn buffer_changes_without_session_are_ignored() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(sample_state())
            .when_action(TodoAction::SetEditDescription {
                value: "ignored".into(),
            })
            .then_state(|state| {
                assert!(state.editing.is_none());
                assert_eq!(state, &sample_state());
            })
            .run();
    }

    #[test]
    fn save_edit_applies_buffer_and_keeps_session_until_persisted() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(sample_state())
            .when_actions([
                TodoAction::StartEdit { id: id(1) },
                TodoAction::SetEditName {
                    value: "Calzone".into(),
                },
                TodoAction::SetEditDescription {
                    value: "Extra cheese".into(),
                },
                TodoAction::SaveEdit { id: id(1) },
            ])
            .then_state(|state| {
                let todo = state.get(id(1)).unwrap();
                assert_eq!(todo.name, "Calzone");
                assert_eq!(todo.description, "Extra cheese");
                assert_eq!(state.edit_cursor(), Some(id(1)));
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn save_edit_for_other_id_is_ignored() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(sample_state())
            .when_actions([
                TodoAction::StartEdit { id: id(1) },
                TodoAction::SetEditName { value: "Calzone".into() },
                TodoAction::SaveEdit { id: id(2) },
            ])
            .then_state(|state| {
                assert_eq!(state.get(id(1)).unwrap().name, "Pizza");
                assert_eq!(state.get(id(2)).unwrap().name, "Salad");
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn persisted_edit_closes_matching_session_only() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(sample_state())
            .when_actions([
                TodoAction::StartEdit { id: id(2) },
                TodoAction::EditPersisted { id: id(1) },
            ])
            .then_state(|state| assert_eq!(state.edit_cursor(), Some(id(2))))
            .run();

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(sample_state())
            .when_actions([
                TodoAction::StartEdit { id: id(2) },
                TodoAction::EditPersisted { id: id(2) },
            ])
            .then_state(|state| assert!(state.editing.is_none()))
            .run();
    }

    #[test]
    fn cancel_edit_drops_session() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(sample_state())
            .when_actions([
                TodoAction::StartEdit { id: id(2) },
                TodoAction::SetEditName { value: "Soup".into() },
                TodoAction::CancelEdit,
            ])
            .then_state(|state| {
                assert!(state.editing.is_none());
                assert_eq!(state.get(id(2)).unwrap().name, "Salad");
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn delete_removes_exactly_one() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(sample_state())
            .when_action(TodoAction::DeleteTodo { id: id(2) })
            .then_state(|state| {
                let ids: Vec<_> = state.todos.iter().map(|t| t.id).collect();
                assert_eq!(ids, vec![id(1), id(3)]);
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn delete_unknown_id_leaves_list_but_still_calls_server() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(sample_state())
            .when_action(TodoAction::DeleteTodo { id: id(8) })
            .then_state(|state| assert_eq!(state, &sample_state()))
            .then_effects(|effects| assertions::assert_effects_count(effects, 1))
            .run();
    }

    #[test]
    fn deleting_edited_item_closes_session() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(sample_state())
            .when_actions([
                TodoAction::StartEdit { id: id(3) },
                TodoAction::DeleteTodo { id: id(3) },
            ])
            .then_state(|state| assert!(state.editing.is_none()))
            .run();
    }

    #[test]
    fn search_does_not_disturb_edit_cursor() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(sample_state())
            .when_actions([
                TodoAction::StartEdit { id: id(3) },
                TodoAction::SetSearch { query: "piz".into() },
            ])
            .then_state(|state| {
                assert_eq!(state.search, "piz");
                assert_eq!(state.edit_cursor(), Some(id(3)));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn failures_do_not_roll_back() {
        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env())
            .given_state(sample_state())
            .when_actions([
                TodoAction::ToggleComplete { id: id(1) },
                TodoAction::RequestFailed {
                    operation: Operation::ToggleComplete,
                    error: "connection refused".into(),
                },
            ])
            .then_state(|state| assert!(state.get(id(1)).unwrap().completed))
            .then_effects(assertions::assert_no_effects)
            .run();
    }
}
