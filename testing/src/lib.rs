//! # Order List Testing
//!
//! Testing utilities and helpers for the order list architecture.
//!
//! This crate provides:
//! - Deterministic clocks for the `Clock` environment trait
//! - A Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use orderlist_testing::{ReducerTest, assertions, clock_on};
//!
//! ReducerTest::new(OrderListReducer::new())
//!     .with_env(test_environment(clock_on(2023, 9, 20)))
//!     .given_state(OrderListState::new(10))
//!     .when_action(OrderListAction::NextPage)
//!     .then_state(|state| assert_eq!(state.query.current_page, 1))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use orderlist_core::environment::Clock;


/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, NaiveDate, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use orderlist_testing::mocks::FixedClock;
    /// use orderlist_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
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

    /// Fixed clock at noon UTC on the given calendar day
    ///
    /// Noon keeps the calendar day stable for any UTC offset within ±11 hours.
    ///
    /// # Panics
    ///
    /// Panics if the date is not a valid calendar date.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn clock_on(year: i32, month: u32, day: u32) -> FixedClock {
        let time = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .expect("test date should be a valid calendar date")
            .and_utc();
        FixedClock::new(time)
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, clock_on};
pub use reducer_test::{ReducerTest, assertions};
