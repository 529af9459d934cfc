//! Minimal to-do list client for a REST `/todos` resource.
//!
//! The list lives in a single [`ListStore`]. Toggle, edit and delete change
//! local state immediately and persist in the background; create waits for
//! the server to assign an id. Failed calls are logged and never rolled
//! back. The [`filter`] module derives the visible subset from the current
//! search query.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use todo_sync::{ClientConfig, HttpTodoApi, ListStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env();
//! let store = ListStore::new(Arc::new(HttpTodoApi::new(&config.api)?));
//!
//! store.load().await?.wait().await;
//! store.add("Pizza", "Order from Luigi's").await?.wait().await;
//! store.set_search("piz").await?;
//!
//! for todo in store.visible().await {
//!     println!("{} {}", todo.id, todo.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod environment;
pub mod error;
pub mod filter;
pub mod list_store;
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;
pub mod reducer;
pub mod shell;
pub mod types;

// Re-export commonly used types
pub use api::{HttpTodoApi, TodoApi};
pub use config::ClientConfig;
pub use environment::TodoEnvironment;
pub use error::ApiError;
pub use filter::{FilteredTodos, filter_todos};
pub use list_store::ListStore;
pub use reducer::TodoReducer;
pub use types::{Todo, TodoAction, TodoId, TodoListState};
