//! Domain types for the todo list client.
//!
//! The list is a plain ordered `Vec` of server records. Only the server
//! assigns ids, so a draft has none and a todo always has one.

use serde::{Deserialize, Serialize};

/// Server-assigned identifier of a todo
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    /// Wraps a raw server id
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TodoId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A single todo as stored by the server
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier
    pub id: TodoId,
    /// Short label
    pub name: String,
    /// Longer label
    pub description: String,
    /// Whether the todo is done
    #[serde(default)]
    pub completed: bool,
}

impl Todo {
    /// Creates a todo that is not completed yet
    #[must_use]
    pub fn new(id: TodoId, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            completed: false,
        }
    }

    /// Copy of this todo with `completed` inverted
    #[must_use]
    pub fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }
}

/// Body of `POST /todos`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodo {
    /// Short label
    pub name: String,
    /// Longer label
    pub description: String,
    /// Always `false` for items created from the form
    pub completed: bool,
}

impl NewTodo {
    /// A new, not yet completed todo
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            completed: false,
        }
    }
}

/// Body of `PUT /todos/{id}`: any subset of the todo's fields
///
/// Fields left as `None` are not serialized.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPatch {
    /// Identifier, sent when the full record is written back
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TodoId>,
    /// New short label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New longer label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New completion flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl From<Todo> for TodoPatch {
    fn from(todo: Todo) -> Self {
        Self {
            id: Some(todo.id),
            name: Some(todo.name),
            description: Some(todo.description),
            completed: Some(todo.completed),
        }
    }
}

impl From<EditBuffer> for TodoPatch {
    fn from(buffer: EditBuffer) -> Self {
        Self {
            name: Some(buffer.name),
            description: Some(buffer.description),
            ..Self::default()
        }
    }
}

/// Contents of the create form
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    /// Name being typed
    pub name: String,
    /// Description being typed
    pub description: String,
}

impl Draft {
    /// Both fields empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.description.is_empty()
    }
}

/// Unsaved inline edits of one todo
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditBuffer {
    /// Edited name
    pub name: String,
    /// Edited description
    pub description: String,
}

impl EditBuffer {
    /// Buffer seeded from the todo's current labels
    #[must_use]
    pub fn seeded_from(todo: &Todo) -> Self {
        Self {
            name: todo.name.clone(),
            description: todo.description.clone(),
        }
    }

    /// Writes the buffer over the todo's labels
    pub fn apply_to(&self, todo: &mut Todo) {
        todo.name.clone_from(&self.name);
        todo.description.clone_from(&self.description);
    }
}

/// The edit cursor together with its buffer
///
/// Kept as one value inside an `Option` so there can never be two items in
/// edit mode, or a buffer without a cursor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSession {
    /// Todo being edited
    pub id: TodoId,
    /// Pending edits
    pub buffer: EditBuffer,
}

/// Remote operation a request belongs to, for logs and failure reports
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// `GET /todos`
    Load,
    /// `POST /todos`
    Create,
    /// `PUT /todos/{id}` with the toggled record
    ToggleComplete,
    /// `PUT /todos/{id}` with the edited fields
    SaveEdit,
    /// `DELETE /todos/{id}`
    Delete,
}

impl Operation {
    /// Stable lowercase name, used as a log field and metric label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Create => "create",
            Self::ToggleComplete => "toggle_complete",
            Self::SaveEdit => "save_edit",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the list view renders from
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoListState {
    /// Items in server order, newly created ones appended
    pub todos: Vec<Todo>,
    /// Create form contents
    pub draft: Draft,
    /// Inline edit in progress, if any
    pub editing: Option<EditSession>,
    /// Free-text search query
    pub search: String,
}

impl TodoListState {
    /// Creates an empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State holding the given items
    #[must_use]
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        Self {
            todos,
            ..Self::default()
        }
    }

    /// Returns the number of todos
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Returns the number of completed todos
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Returns a mutable todo by ID
    pub fn get_mut(&mut self, id: TodoId) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|t| t.id == id)
    }

    /// Checks if a todo exists
    #[must_use]
    pub fn exists(&self, id: TodoId) -> bool {
        self.get(id).is_some()
    }

    /// Id under the edit cursor
    #[must_use]
    pub fn edit_cursor(&self) -> Option<TodoId> {
        self.editing.as_ref().map(|session| session.id)
    }

    /// Whether `id` is the item in edit mode
    #[must_use]
    pub fn is_editing(&self, id: TodoId) -> bool {
        self.edit_cursor() == Some(id)
    }
}

/// Actions representing user commands and the results of remote calls
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoAction {
    // ========== Commands ==========
    /// Command: fetch the whole list from the server
    Load,

    /// Command: replace the create form contents
    UpdateDraft {
        /// Name field
        name: String,
        /// Description field
        description: String,
    },

    /// Command: create a todo on the server
    AddTodo {
        /// Name of the new todo
        name: String,
        /// Description of the new todo
        description: String,
    },

    /// Command: flip `completed` locally and persist the full record
    ToggleComplete {
        /// Todo to toggle
        id: TodoId,
    },

    /// Command: put a todo into edit mode
    StartEdit {
        /// Todo to edit
        id: TodoId,
    },

    /// Command: change the name in the edit buffer
    SetEditName {
        /// New name
        value: String,
    },

    /// Command: change the description in the edit buffer
    SetEditDescription {
        /// New description
        value: String,
    },

    /// Command: leave edit mode without saving
    CancelEdit,

    /// Command: apply the edit buffer and persist it
    SaveEdit {
        /// Todo being saved
        id: TodoId,
    },

    /// Command: remove a todo locally and on the server
    DeleteTodo {
        /// Todo to delete
        id: TodoId,
    },

    /// Command: change the search query
    SetSearch {
        /// Free-text query
        query: String,
    },

    // ========== Results ==========
    /// Result: the server returned the full list
    TodosLoaded {
        /// Items in server order
        todos: Vec<Todo>,
    },

    /// Result: the server created a todo
    TodoCreated {
        /// The created record with its assigned id
        todo: Todo,
    },

    /// Result: a toggled completion flag was stored
    CompletionPersisted {
        /// Toggled todo
        id: TodoId,
    },

    /// Result: an inline edit was stored
    EditPersisted {
        /// Edited todo
        id: TodoId,
    },

    /// Result: the server deleted a todo
    TodoDeleted {
        /// Deleted todo
        id: TodoId,
    },

    /// Result: a remote call failed (already logged at the call site)
    RequestFailed {
        /// Which call failed
        operation: Operation,
        /// Error description
        error: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_id_is_a_bare_number_on_the_wire() {
        let json = serde_json::to_string(&TodoId::new(7)).unwrap();
        assert_eq!(json, "7");
        assert_eq!("12".parse::<TodoId>().unwrap(), TodoId::new(12));
        assert!("twelve".parse::<TodoId>().is_err());
    }

    #[test]
    fn todo_deserializes_server_record() {
        let todo: Todo = serde_json::from_str(
            r#"{"id":1,"name":"A","description":"B","completed":true}"#,
        )
        .unwrap();
        assert_eq!(todo.id, TodoId::new(1));
        assert!(todo.completed);
    }

    #[test]
    fn missing_completed_defaults_to_false() {
        let todo: Todo =
            serde_json::from_str(r#"{"id":2,"name":"A","description":"B"}"#).unwrap();
        assert!(!todo.completed);
    }

    #[test]
    fn toggled_only_flips_completed() {
        let todo = Todo::new(TodoId::new(1), "A", "B");
        let toggled = todo.toggled();
        assert!(toggled.completed);
        assert_eq!(toggled.name, "A");
        assert_eq!(toggled.toggled(), todo);
    }

    #[test]
    fn new_todo_body_has_no_id() {
        let body = serde_json::to_value(NewTodo::new("X", "Y")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"name": "X", "description": "Y", "completed": false})
        );
    }

    #[test]
    fn edit_patch_carries_only_labels() {
        let patch = TodoPatch::from(EditBuffer {
            name: "N".into(),
            description: "D".into(),
        });
        assert_eq!(
            serde_json::to_value(patch).unwrap(),
            serde_json::json!({"name": "N", "description": "D"})
        );
    }

    #[test]
    fn full_patch_carries_every_field() {
        let patch = TodoPatch::from(Todo::new(TodoId::new(3), "N", "D").toggled());
        assert_eq!(
            serde_json::to_value(patch).unwrap(),
            serde_json::json!({"id": 3, "name": "N", "description": "D", "completed": true})
        );
    }

    #[test]
    fn state_lookup_by_id() {
        let state = TodoListState::with_todos(vec![
            Todo::new(TodoId::new(1), "A", ""),
            Todo::new(TodoId::new(4), "B", "").toggled(),
        ]);
        assert_eq!(state.count(), 2);
        assert_eq!(state.completed_count(), 1);
        assert!(state.exists(TodoId::new(4)));
        assert!(!state.exists(TodoId::new(2)));
        assert_eq!(state.edit_cursor(), None);
    }

    #[test]
    fn operation_labels() {
        assert_eq!(Operation::ToggleComplete.to_string(), "toggle_complete");
        assert_eq!(Operation::SaveEdit.as_str(), "save_edit");
    }
}
