//! Declarative macros for effect construction

/// Create an `Effect::Future` from an async block
///
/// The block runs on the runtime and evaluates to `Option<Action>`; a `Some`
/// is fed back into the reducer.
///
/// # Example
///
/// ```rust,ignore
/// use todo_sync_core::async_effect;
///
/// let api = Arc::clone(&env.api);
/// async_effect! {
///     match api.list().await {
///         Ok(todos) => Some(TodoAction::TodosLoaded { todos }),
///         Err(error) => Some(TodoAction::RequestFailed { operation: Operation::Load, error: error.to_string() }),
///     }
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}
