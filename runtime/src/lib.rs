//! # Waymark Runtime
//!
//! The store runtime that drives the marker synchronization flow.
//!
//! ## Core Components
//!
//! - **Store**: owns the state and a FIFO action queue
//! - **Worker**: the single writer; runs the reducer and executes its effects
//! - **Feedback loop**: actions produced by effects are reduced before the
//!   next queued action is taken
//!
//! The queue gives mutual exclusion between user interactions: a map click
//! that is waiting on the remote store holds back a clear-all issued right
//! after it, so neither handler ever sees a stale marker list.
//!
//! ## Example
//!
//! ```ignore
//! use waymark_runtime::Store;
//!
//! let store = Store::new(MarkerState::new(), MarkerReducer::new(), env);
//!
//! store.send(MarkerAction::ToggleAddMode).await?;
//! store.send(MarkerAction::MapClicked { position: Some(LatLng::new(49.84, 24.03)?) }).await?;
//!
//! let count = store.state(|s| s.markers.len()).await;
//! ```

use waymark_core::{effect::Effect, reducer::Reducer};

/// Prometheus metrics for observability
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// Returned when `send()` is called after shutdown was initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for queued actions to drain
        #[error("Shutdown timed out with {0} actions still queued")]
        ShutdownTimeout(usize),

        /// The worker task is gone (it panicked inside a reducer or effect)
        #[error("Store worker stopped")]
        WorkerStopped,
    }
}

pub use error::StoreError;
pub use store::Store;

/// Store module - the single-writer runtime
pub mod store {
    use super::metrics::StoreMetrics;
    use super::{Effect, Reducer, StoreError};
    use futures::future::{BoxFuture, join_all};
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::{Duration, Instant};
    use tokio::sync::{RwLock, broadcast, mpsc, oneshot};

    /// Default capacity of the action broadcast channel
    const DEFAULT_BROADCAST_CAPACITY: usize = 64;

    enum Command<A> {
        Dispatch {
            action: A,
            ack: Option<oneshot::Sender<()>>,
        },
        Barrier(oneshot::Sender<()>),
    }

    /// The Store - runtime for a reducer
    ///
    /// Every action goes through one FIFO queue drained by one worker task.
    /// For each action the worker:
    ///
    /// 1. runs the reducer under the state write lock,
    /// 2. executes the returned effects to completion,
    /// 3. reduces the actions those effects produced (same procedure),
    ///
    /// and only then takes the next action from the queue. `Delay` effects
    /// are the exception: they are spawned off the worker and re-enter the
    /// queue at the back when they fire.
    ///
    /// Cloning a `Store` is cheap; all clones share the same queue and state.
    /// The worker stops once every clone has been dropped.
    ///
    /// # Panics
    ///
    /// Constructors spawn the worker with [`tokio::spawn`] and therefore
    /// panic when called outside a Tokio runtime.
    pub struct Store<S, A> {
        state: Arc<RwLock<S>>,
        queue: mpsc::UnboundedSender<Command<A>>,
        action_broadcast: broadcast::Sender<A>,
        shutdown: Arc<AtomicBool>,
        queued: Arc<AtomicUsize>,
    }

    impl<S, A> Store<S, A>
    where
        S: Send + Sync + 'static,
        A: Clone + Send + 'static,
    {
        /// Create a new store and start its worker
        #[must_use]
        pub fn new<R, E>(initial_state: S, reducer: R, environment: E) -> Self
        where
            R: Reducer<State = S, Action = A, Environment = E> + Send + 'static,
            E: Send + 'static,
        {
            Self::with_broadcast_capacity(
                initial_state,
                reducer,
                environment,
                DEFAULT_BROADCAST_CAPACITY,
            )
        }

        /// Create a store with a custom action broadcast capacity
        ///
        /// Subscribers that fall more than `capacity` actions behind miss the
        /// oldest ones.
        #[must_use]
        pub fn with_broadcast_capacity<R, E>(
            initial_state: S,
            reducer: R,
            environment: E,
            capacity: usize,
        ) -> Self
        where
            R: Reducer<State = S, Action = A, Environment = E> + Send + 'static,
            E: Send + 'static,
        {
            let state = Arc::new(RwLock::new(initial_state));
            let (queue, receiver) = mpsc::unbounded_channel();
            let (action_broadcast, _) = broadcast::channel(capacity.max(1));
            let shutdown = Arc::new(AtomicBool::new(false));
            let queued = Arc::new(AtomicUsize::new(0));

            let worker = Worker {
                state: Arc::clone(&state),
                reducer,
                environment,
                action_broadcast: action_broadcast.clone(),
                delayed: DelayedSender {
                    queue: queue.downgrade(),
                    shutdown: Arc::clone(&shutdown),
                    queued: Arc::clone(&queued),
                },
                queued: Arc::clone(&queued),
            };
            tokio::spawn(worker.run(receiver));

            Self {
                state,
                queue,
                action_broadcast,
                shutdown,
                queued,
            }
        }

        /// Send an action and wait until it has been fully processed
        ///
        /// Resolves after the reducer ran, every effect it returned completed
        /// and every action fed back by those effects was reduced in turn.
        ///
        /// # Errors
        ///
        /// - [`StoreError::ShutdownInProgress`] after [`Store::shutdown`]
        /// - [`StoreError::WorkerStopped`] if the worker is gone
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            let (ack, done) = oneshot::channel();
            self.dispatch(action, Some(ack))?;
            done.await.map_err(|_| StoreError::WorkerStopped)
        }

        /// Queue an action without waiting for it
        ///
        /// The action is processed in arrival order relative to every other
        /// `send`/`enqueue` call.
        ///
        /// # Errors
        ///
        /// Same as [`Store::send`], minus waiting.
        pub fn enqueue(&self, action: A) -> Result<(), StoreError> {
            self.dispatch(action, None)
        }

        fn dispatch(
            &self,
            action: A,
            ack: Option<oneshot::Sender<()>>,
        ) -> Result<(), StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                StoreMetrics::record_rejected();
                return Err(StoreError::ShutdownInProgress);
            }

            let depth = self.queued.fetch_add(1, Ordering::SeqCst) + 1;
            StoreMetrics::set_queue_depth(depth);

            if self.queue.send(Command::Dispatch { action, ack }).is_err() {
                self.queued.fetch_sub(1, Ordering::SeqCst);
                tracing::error!("Store worker is gone, action dropped");
                return Err(StoreError::WorkerStopped);
            }

            tracing::trace!(queue_depth = depth, "Action queued");
            Ok(())
        }

        /// Read the current state via a closure
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        /// Subscribe to every action the worker reduces
        ///
        /// Includes actions fed back by effects, so observers see remote
        /// outcomes (`MarkerCreated`, `DeleteFailed`, ...) as they land.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Number of actions accepted but not yet fully processed
        #[must_use]
        pub fn queue_depth(&self) -> usize {
            self.queued.load(Ordering::SeqCst)
        }

        /// Stop accepting actions and wait for the queue to drain
        ///
        /// Delayed actions that fire after this call are dropped.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if queued actions are still
        /// being processed when `timeout` elapses.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            self.shutdown.store(true, Ordering::Release);

            let (barrier, drained) = oneshot::channel();
            if self.queue.send(Command::Barrier(barrier)).is_err() {
                // Worker already gone, nothing left to drain
                return Ok(());
            }

            if tokio::time::timeout(timeout, drained).await.is_ok() {
                tracing::info!("Queue drained, shutdown successful");
                Ok(())
            } else {
                let pending = self.queued.load(Ordering::SeqCst);
                tracing::error!(pending_actions = pending, "Shutdown timeout");
                Err(StoreError::ShutdownTimeout(pending))
            }
        }
    }

    impl<S, A> Clone for Store<S, A> {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                queue: self.queue.clone(),
                action_broadcast: self.action_broadcast.clone(),
                shutdown: Arc::clone(&self.shutdown),
                queued: Arc::clone(&self.queued),
            }
        }
    }

    /// Handle used by `Delay` effects to re-enter the queue
    ///
    /// Holds a weak sender so pending delays don't keep the worker alive.
    struct DelayedSender<A> {
        queue: mpsc::WeakUnboundedSender<Command<A>>,
        shutdown: Arc<AtomicBool>,
        queued: Arc<AtomicUsize>,
    }

    impl<A> Clone for DelayedSender<A> {
        fn clone(&self) -> Self {
            Self {
                queue: self.queue.clone(),
                shutdown: Arc::clone(&self.shutdown),
                queued: Arc::clone(&self.queued),
            }
        }
    }

    impl<A> DelayedSender<A> {
        fn send(&self, action: A) {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::debug!("Dropping delayed action: store is shutting down");
                return;
            }
            let Some(queue) = self.queue.upgrade() else {
                return;
            };
            self.queued.fetch_add(1, Ordering::SeqCst);
            if queue.send(Command::Dispatch { action, ack: None }).is_err() {
                self.queued.fetch_sub(1, Ordering::SeqCst);
            }
        }
    }

    struct Worker<S, A, E, R> {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        action_broadcast: broadcast::Sender<A>,
        delayed: DelayedSender<A>,
        queued: Arc<AtomicUsize>,
    }

    impl<S, A, E, R> Worker<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        A: Clone + Send + 'static,
    {
        async fn run(mut self, mut receiver: mpsc::UnboundedReceiver<Command<A>>) {
            tracing::debug!("Store worker started");

            while let Some(command) = receiver.recv().await {
                match command {
                    Command::Dispatch { action, ack } => {
                        self.process(action).await;

                        let depth = self.queued.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
                        StoreMetrics::set_queue_depth(depth);

                        if let Some(ack) = ack {
                            // Caller may have stopped waiting
                            let _ = ack.send(());
                        }
                    },
                    Command::Barrier(drained) => {
                        let _ = drained.send(());
                    },
                }
            }

            tracing::debug!("All store handles dropped, worker stopping");
        }

        /// Reduce one queued action and everything its effects feed back
        async fn process(&mut self, action: A) {
            let mut pending = VecDeque::from([action]);

            while let Some(action) = pending.pop_front() {
                let effects = {
                    let mut state = self.state.write().await;
                    let start = Instant::now();
                    let effects = self
                        .reducer
                        .reduce(&mut state, action.clone(), &self.environment);
                    StoreMetrics::record_action(start.elapsed());
                    effects
                };

                // Observers see the action once its state change is visible
                let _ = self.action_broadcast.send(action);

                tracing::trace!(effects = effects.len(), "Reducer completed");
                for effect in effects {
                    let produced = execute(effect, self.delayed.clone()).await;
                    pending.extend(produced);
                }
            }
        }
    }

    /// Execute one effect to completion and collect the actions it produced
    fn execute<A>(effect: Effect<A>, delayed: DelayedSender<A>) -> BoxFuture<'static, Vec<A>>
    where
        A: Send + 'static,
    {
        Box::pin(async move {
            match effect {
                Effect::None => Vec::new(),
                Effect::Future(fut) => {
                    StoreMetrics::record_effect("future");
                    let start = Instant::now();
                    let produced = fut.await;
                    tracing::trace!(
                        elapsed_ms = start.elapsed().as_millis(),
                        produced = produced.is_some(),
                        "Effect::Future completed"
                    );
                    produced.into_iter().collect()
                },
                Effect::Sequential(effects) => {
                    StoreMetrics::record_effect("sequential");
                    let mut produced = Vec::new();
                    for effect in effects {
                        produced.extend(execute(effect, delayed.clone()).await);
                    }
                    produced
                },
                Effect::Parallel(effects) => {
                    StoreMetrics::record_effect("parallel");
                    join_all(
                        effects
                            .into_iter()
                            .map(|effect| execute(effect, delayed.clone())),
                    )
                    .await
                    .into_iter()
                    .flatten()
                    .collect()
                },
                Effect::Delay { duration, action } => {
                    StoreMetrics::record_effect("delay");
                    tracing::trace!(?duration, "Scheduling delayed action");
                    tokio::spawn(async move {
                        tokio::time::sleep(duration).await;
                        delayed.send(*action);
                    });
                    Vec::new()
                },
            }
        })
    }
}
