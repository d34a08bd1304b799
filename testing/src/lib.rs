//! # Waymark Testing
//!
//! Testing utilities for reducers and stores.
//!
//! This crate provides:
//! - Deterministic clocks for marker timestamps
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - Effect assertions and an effect runner that resolves the actions a
//!   reducer's effects would feed back
//!
//! Mock marker stores and map widgets live next to their traits in
//! `waymark-markers::mocks`.
//!
//! ## Example
//!
//! ```ignore
//! use waymark_testing::{ReducerTest, assertions, test_clock};
//!
//! ReducerTest::new(MarkerReducer::new())
//!     .with_env(test_env())
//!     .given_state(MarkerState::new())
//!     .when_action(MarkerAction::ToggleAddMode)
//!     .then_state(|state| assert!(state.is_add_mode))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

use chrono::{DateTime, Duration, Utc};
use waymark_core::environment::Clock;

mod effects;

/// Mock implementations of environment traits
pub mod mocks {
    use super::{Clock, DateTime, Duration, Utc};
    use std::sync::Mutex;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use waymark_testing::mocks::FixedClock;
    /// use waymark_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that advances by a fixed step on every reading
    ///
    /// Handy when several markers are created in one test and their
    /// timestamps must differ.
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
        step: Duration,
    }

    impl SteppingClock {
        /// Start at `start`, advancing by `step` after each reading
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step: Duration) -> Self {
            Self {
                next: Mutex::new(start),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let mut next = self
                .next
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let now = *next;
            *next = now + self.step;
            now
        }
    }

    /// The instant every test clock starts at: 2025-01-01 00:00:00 UTC
    #[must_use]
    pub fn test_epoch() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(1_735_689_600)
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(test_epoch())
    }
}

// Re-export commonly used items
pub use effects::run_effects;
pub use mocks::{FixedClock, SteppingClock, test_clock, test_epoch};
pub use reducer_test::{ReducerTest, assertions};
