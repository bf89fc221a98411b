//! # Ticket Queue Testing
//!
//! Testing utilities for the ticket queue.
//!
//! This crate provides:
//! - In-memory implementations of [`TicketStore`](ticket_queue_core::TicketStore)
//! - Deterministic clocks
//! - Ledger fixtures
//!
//! ## Example
//!
//! ```
//! use ticket_queue_testing::test_ledger;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (ledger, store) = test_ledger();
//! let number = ledger.create("Ana", "Consulta").await?;
//!
//! assert_eq!(number.get(), 1);
//! assert_eq!(store.len(), 1);
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use ticket_queue_core::TicketLedger;
use ticket_queue_core::environment::Clock;

pub mod store;

/// Mock implementations of environment traits
pub mod mocks {
    use super::{AtomicI64, Clock, DateTime, Duration, Ordering, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use ticket_queue_testing::mocks::FixedClock;
    /// use ticket_queue_core::environment::Clock;
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

    /// Clock that moves forward by one second on every reading.
    ///
    /// Gives each ticket a distinct creation time, which makes ordering
    /// assertions independent of the number tie-breaker.
    #[derive(Debug)]
    pub struct SteppingClock {
        start: DateTime<Utc>,
        ticks: AtomicI64,
    }

    impl SteppingClock {
        /// Create a clock whose first reading is `start`
        #[must_use]
        pub const fn new(start: DateTime<Utc>) -> Self {
            Self {
                start,
                ticks: AtomicI64::new(0),
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
            self.start + Duration::seconds(tick)
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(epoch())
    }

    /// Create a stepping clock starting at 2025-01-01 00:00:00 UTC
    #[must_use]
    pub fn stepping_clock() -> SteppingClock {
        SteppingClock::new(epoch())
    }

    #[allow(clippy::expect_used)]
    fn epoch() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .expect("hardcoded timestamp should always parse")
            .with_timezone(&Utc)
    }
}

/// Ledger over a fresh in-memory store and a stepping clock.
///
/// Returns the store too, so tests can inspect it directly.
#[must_use]
pub fn test_ledger() -> (TicketLedger<InMemoryTicketStore>, InMemoryTicketStore) {
    let store = InMemoryTicketStore::new();
    let ledger = TicketLedger::new(store.clone(), Arc::new(mocks::stepping_clock()));
    (ledger, store)
}

// Re-export commonly used items
pub use mocks::{FixedClock, SteppingClock, stepping_clock, test_clock};
pub use store::{FailingTicketStore, InMemoryTicketStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn stepping_clock_advances() {
        let clock = stepping_clock();
        let first = clock.now();
        let second = clock.now();
        assert_eq!(second - first, Duration::seconds(1));
    }
}
