//! # todo-sync runtime
//!
//! The Store runtime that owns the client state, runs the reducer and
//! executes the effects it returns.
//!
//! ## Core Components
//!
//! - **Store**: owns the state and serializes every reduction behind a write lock
//! - **Effect executor**: spawns effect futures and feeds their actions back
//! - **`EffectHandle`**: lets callers wait until the effects of one action are done
//!
//! ## Example
//!
//! ```ignore
//! use todo_sync_runtime::Store;
//!
//! let store = Store::new(TodoListState::default(), TodoReducer::new(), env);
//!
//! let mut handle = store.send(TodoAction::Load).await?;
//! handle.wait().await;
//!
//! let count = store.state(|s| s.todos.len()).await;
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use todo_sync_core::{effect::Effect, reducer::Reducer};
use tokio::sync::{RwLock, watch};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for a result action
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// a matching action is received.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`]. Waiting on it returns once every effect
/// spawned for that action has finished and its feedback action (if any) has
/// been reduced.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(TodoAction::ToggleComplete { id }).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a new handle and the tracking half used by the executor
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: tx,
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        let (handle, _tracking) = Self::new();
        handle
    }

    /// Number of effects still running for this action
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                // Sender dropped: every tracking clone is gone, so nothing
                // can still be running.
                break;
            }
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before all
    /// effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements the effect counter on drop,
/// even if the effect panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, DecrementGuard, Duration, Effect,
        EffectHandle, EffectTracking, Ordering, Reducer, RwLock, StoreError,
    };
    use tokio::sync::broadcast;

    /// The Store - single owner of the client state
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`; every reduction takes the write lock)
    /// 2. Reducer (all state transitions)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    ///
    /// Cloning a Store is cheap and every clone shares the same state.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        /// Every action produced by an effect is broadcast here before it is
        /// fed back into the reducer.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// The action broadcast buffers 16 actions; use
        /// [`Store::with_broadcast_capacity`] for chattier observers.
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
        }

        /// Create a new Store with custom action broadcast capacity
        #[must_use]
        pub fn with_broadcast_capacity(
            initial_state: S,
            reducer: R,
            environment: E,
            capacity: usize,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                action_broadcast,
            }
        }

        /// Number of effects currently running across all actions
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::Acquire)
        }

        /// Initiate graceful shutdown of the store
        ///
        /// Rejects new actions, then waits for in-flight effects.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before all
        /// pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);

            self.shutdown.store(true, Ordering::SeqCst);

            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(20);

            loop {
                let pending = self.pending_effects.load(Ordering::SeqCst);

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    metrics::counter!("store.shutdown.completed").increment(1);
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(
                        pending_effects = pending,
                        "Shutdown timeout: {} effects still running", pending
                    );
                    metrics::counter!("store.shutdown.timeout").increment(1);
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Spawns the returned effects
        ///
        /// `send()` returns after starting effect execution, not completion.
        /// Effects of different actions may complete in any order.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError>
        where
            R: Clone,
            E: Clone,
        {
            // Counted as pending until its effects are spawned, so shutdown
            // cannot finish draining while this send waits for the lock
            self.pending_effects.fetch_add(1, Ordering::SeqCst);
            let _in_flight = AtomicCounterGuard(Arc::clone(&self.pending_effects));

            if self.shutdown.load(Ordering::SeqCst) {
                return Err(Self::reject());
            }

            let (handle, tracking) = EffectHandle::new();

            let effects = {
                let mut state = self.state.write().await;
                if self.shutdown.load(Ordering::SeqCst) {
                    return Err(Self::reject());
                }

                metrics::counter!("store.commands.total").increment(1);
                let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                tracing::trace!("Reducer completed, returned {} effects", effects.len());
                effects
            };

            for effect in effects {
                self.execute_effect(effect, tracking.clone());
            }

            Ok(handle)
        }

        fn reject() -> StoreError {
            tracing::warn!("Rejected action: store is shutting down");
            metrics::counter!("store.shutdown.rejected_actions").increment(1);
            StoreError::ShutdownInProgress
        }

        /// Send an action and wait for a matching result action
        ///
        /// Subscribes to the action broadcast before sending, so the result
        /// cannot be missed.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: no matching action before the timeout
        /// - [`StoreError::ChannelClosed`]: action broadcast channel closed
        /// - [`StoreError::ShutdownInProgress`]: store is shutting down
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            R: Clone,
            E: Clone,
            F: Fn(&A) -> bool,
        {
            let mut rx = self.action_broadcast.subscribe();

            self.send(action).await?;

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Action observer lagged, {} actions skipped", skipped);
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to all actions produced by effects
        ///
        /// Actions sent directly via [`Store::send`] are not broadcast.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let count = store.state(|s| s.todos.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Execute an effect with tracking
        ///
        /// `Effect::Future` runs on its own tokio task. Failures inside the
        /// future are the effect's business: it reports them as an action.
        fn execute_effect(&self, effect: Effect<A>, tracking: EffectTracking)
        where
            R: Clone,
            E: Clone,
        {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    tracking.increment();

                    self.pending_effects.fetch_add(1, Ordering::SeqCst);
                    let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = DecrementGuard(tracking);
                        let _pending_guard = pending_guard;

                        if let Some(action) = fut.await {
                            tracing::trace!("Effect::Future produced an action, sending to store");

                            let _ = store.action_broadcast.send(action.clone());
                            store.feed_back(action).await;
                        } else {
                            tracing::trace!("Effect::Future completed with no action");
                        }
                    });
                },
            }
        }

        /// Reduce an action produced by an effect
        ///
        /// Unlike [`Store::send`] this ignores the shutdown flag so in-flight
        /// results still land while the store drains.
        async fn feed_back(&self, action: A)
        where
            R: Clone,
            E: Clone,
        {
            let (_handle, tracking) = EffectHandle::new();

            let effects = {
                let mut state = self.state.write().await;
                self.reducer.reduce(&mut *state, action, &self.environment)
            };

            for effect in effects {
                self.execute_effect(effect, tracking.clone());
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

pub use store::Store;
