//! # Waymark Core
//!
//! Core traits and types for the Waymark marker synchronization flow.
//!
//! Every user interaction with the map (a click, a drag, a toolbar button)
//! becomes an **action**. A **reducer** turns `(state, action, environment)`
//! into a new state plus a list of **effects**: descriptions of the remote
//! calls and camera moves that should happen next. The runtime crate executes
//! those effects and feeds their results back as further actions.
//!
//! ## Core Concepts
//!
//! - **State**: the session's marker list and UI flags
//! - **Action**: user commands and the events produced by remote calls
//! - **Reducer**: pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: side effect descriptions (not execution)
//! - **Environment**: injected collaborators (marker store, map widget, clock)
//!
//! ## Example
//!
//! ```ignore
//! use waymark_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! impl Reducer for PinReducer {
//!     type State = PinState;
//!     type Action = PinAction;
//!     type Environment = PinEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut PinState,
//!         action: PinAction,
//!         env: &PinEnvironment,
//!     ) -> SmallVec<[Effect<PinAction>; 4]> {
//!         match action {
//!             PinAction::Toggle => {
//!                 state.enabled = !state.enabled;
//!                 smallvec![Effect::None]
//!             }
//!         }
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Declarative helpers for building effects
mod effect_macros;

/// Reducer module - the core trait for marker business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They never touch the network themselves; anything that suspends is returned
/// as an [`Effect`](crate::effect::Effect).
pub mod reducer {
    use super::SmallVec;
    use super::effect::Effect;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
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
        /// Implementations validate the action against the current state,
        /// update the state in place and return the effects the runtime
        /// should execute. Most actions produce zero or one effect, hence the
        /// inline capacity of four.
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
/// Effects describe work for the runtime: awaiting a remote call, scheduling
/// a delayed action, or grouping other effects. They are values, so reducers
/// stay deterministic and tests can inspect what *would* happen.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Boxed future produced by an [`Effect::Future`]
    pub type EffectFuture<Action> = Pin<Box<dyn Future<Output = Option<Action>> + Send>>;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are returned from reducers
    /// and executed by the store runtime.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects concurrently
        Parallel(Vec<Effect<Action>>),

        /// Run effects one after another, each awaited before the next starts
        Sequential(Vec<Effect<Action>>),

        /// Dispatch an action after a delay (transient notices, timeouts)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after the delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// If the future resolves to `Some(action)`, the action is fed back
        /// into the reducer.
        Future(EffectFuture<Action>),
    }

    // Futures don't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run concurrently
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Whether this effect does nothing at all
        ///
        /// Empty groups count as no-ops.
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) | Effect::Sequential(effects) => {
                    effects.iter().all(Effect::is_none)
                },
                Effect::Delay { .. } | Effect::Future(_) => false,
            }
        }
    }
}

/// Environment module - dependency injection traits
///
/// Collaborators that are not specific to markers live here. The marker
/// store and the map widget are defined next to the marker domain.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time so marker timestamps are testable
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall clock backed by [`Utc::now`]
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
