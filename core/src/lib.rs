//! # todo-sync core
//!
//! Core traits and types for the todo-sync client.
//!
//! The client keeps all of its list state in one place and only changes it
//! through a reducer:
//!
//! - **State**: everything the list view needs (items, draft, edit cursor, search)
//! - **Action**: user commands plus the results delivered by remote calls
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: a description of a remote call, run later by the runtime
//! - **Environment**: injected dependencies (the REST API client)
//!
//! ## Example
//!
//! ```ignore
//! use todo_sync_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! impl Reducer for TodoReducer {
//!     type State = TodoListState;
//!     type Action = TodoAction;
//!     type Environment = TodoEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut TodoListState,
//!         action: TodoAction,
//!         env: &TodoEnvironment,
//!     ) -> SmallVec<[Effect<TodoAction>; 4]> {
//!         match action {
//!             TodoAction::Load => smallvec::smallvec![env.fetch_todos()],
//!             _ => SmallVec::new(),
//!         }
//!     }
//! }
//! ```

pub use smallvec::{smallvec, SmallVec};

mod effect_macros;

/// Reducer module - the trait holding all state transitions
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They never perform I/O themselves; remote calls are returned as [`Effect`]s.
///
/// [`Effect`]: crate::effect::Effect
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Updates `state` in place and returns descriptions of the side
        /// effects to run. Most actions produce zero or one effect, hence the
        /// inline capacity.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects are values, not execution. The runtime decides when and where to
/// run them and feeds any resulting action back into the reducer.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    impl<Action> Effect<Action> {
        /// Returns `true` for [`Effect::None`]
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Self::None)
        }
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }
}
