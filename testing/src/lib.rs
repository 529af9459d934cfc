//! # todo-sync testing
//!
//! Testing utilities for reducers and stores.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given/When/Then builder for reducer unit tests
//! - [`assertions`]: effect assertion helpers
//! - [`init_test_tracing`]: log capture for tests
//!
//! ## Example
//!
//! ```ignore
//! use todo_sync_testing::{assertions, ReducerTest};
//!
//! ReducerTest::new(TodoReducer::new())
//!     .with_env(test_environment())
//!     .given_state(TodoListState::default())
//!     .when_action(TodoAction::SetSearch { query: "milk".into() })
//!     .then_state(|state| assert_eq!(state.search, "milk"))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```


pub use reducer_test::{ReducerTest, assertions};

/// Install a `tracing` subscriber that writes through the test harness
///
/// Safe to call from every test; only the first call installs anything.
/// Honors `RUST_LOG`, defaulting to `debug` for the todo-sync crates.
pub fn init_test_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "todo_sync=debug,todo_sync_runtime=debug".into());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
