//! In-memory ticket stores for tests.
//!
//! - [`InMemoryTicketStore`]: `HashMap`-backed store with a high-water counter
//! - [`FailingTicketStore`]: wraps another store and fails selected operations

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Lock poisoning only happens after a test already panicked

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use ticket_queue_core::store::{StateUpdate, StoreResult, TicketStore};
use ticket_queue_core::{NewTicket, StoreError, Ticket, TicketId, TicketNumber, TicketState};

#[derive(Debug, Default)]
struct Inner {
    tickets: HashMap<TicketId, Ticket>,
    last_number: u64,
}

/// In-memory ticket store for fast, deterministic testing.
///
/// Clones share the same underlying data, so a test can keep a handle to
/// the store after handing one to a ledger.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use ticket_queue_core::TicketLedger;
/// use ticket_queue_testing::{InMemoryTicketStore, test_clock};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryTicketStore::new();
/// let ledger = TicketLedger::new(store.clone(), Arc::new(test_clock()));
///
/// ledger.create("Ana", "Consulta").await?;
/// assert_eq!(store.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryTicketStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryTicketStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose next number follows `last_number`.
    ///
    /// Simulates a store that has already issued (and possibly deleted)
    /// tickets.
    #[must_use]
    pub fn with_last_number(last_number: u64) -> Self {
        let store = Self::new();
        store.inner.lock().unwrap().last_number = last_number;
        store
    }

    /// Number of stored tickets
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().tickets.len()
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Highest number ever issued
    #[must_use]
    pub fn last_number(&self) -> u64 {
        self.inner.lock().unwrap().last_number
    }

    /// Overwrite a ticket's state, bypassing the ledger.
    ///
    /// Simulates another front-end sharing the store.
    pub fn force_state(&self, id: TicketId, state: TicketState) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(ticket) = inner.tickets.remove(&id) {
            inner.tickets.insert(id, ticket.with_state(state));
        }
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("Mutex lock failed".to_string()))
    }
}

impl TicketStore for InMemoryTicketStore {
    async fn fetch_all(&self) -> StoreResult<Vec<Ticket>> {
        let mut tickets: Vec<Ticket> = self.lock()?.tickets.values().cloned().collect();
        tickets.sort_by_key(Ticket::sort_key);
        Ok(tickets)
    }

    async fn fetch(&self, id: TicketId) -> StoreResult<Option<Ticket>> {
        Ok(self.lock()?.tickets.get(&id).cloned())
    }

    async fn insert(&self, candidate: NewTicket) -> StoreResult<Ticket> {
        // Counter bump and insert happen under one lock and never suspend.
        let mut inner = self.lock()?;
        if inner.tickets.contains_key(&candidate.id) {
            return Err(StoreError::Database(format!(
                "Ticket {} already exists",
                candidate.id
            )));
        }

        let Some(number) = TicketNumber::new(inner.last_number).next() else {
            return Err(StoreError::Corrupt(format!(
                "Ticket numbers exhausted after {}",
                inner.last_number
            )));
        };
        let ticket = candidate.into_ticket(number);
        inner.last_number = number.get();
        inner.tickets.insert(ticket.id(), ticket.clone());
        Ok(ticket)
    }

    async fn update_state(
        &self,
        id: TicketId,
        expected: TicketState,
        next: TicketState,
    ) -> StoreResult<StateUpdate> {
        let mut inner = self.lock()?;
        let Some(ticket) = inner.tickets.remove(&id) else {
            return Ok(StateUpdate::Missing);
        };

        let current = ticket.state();
        let (ticket, outcome) = if current == expected {
            (ticket.with_state(next), StateUpdate::Applied)
        } else {
            (ticket, StateUpdate::Stale { current })
        };
        inner.tickets.insert(id, ticket);
        Ok(outcome)
    }

    async fn delete(&self, id: TicketId) -> StoreResult<bool> {
        Ok(self.lock()?.tickets.remove(&id).is_some())
    }
}

/// Store wrapper that fails selected operations.
///
/// Failures can be toggled while the store is in use, so a test can let a
/// few calls through and then simulate an outage.
#[derive(Clone, Debug)]
pub struct FailingTicketStore<S> {
    inner: S,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl<S> FailingTicketStore<S> {
    /// Wrap `inner`; nothing fails until configured.
    #[must_use]
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fail_reads: Arc::new(AtomicBool::new(false)),
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make `fetch_all` and `fetch` fail (or succeed again).
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make `insert`, `update_state` and `delete` fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The wrapped store
    #[must_use]
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    fn check(flag: &AtomicBool, operation: &str) -> StoreResult<()> {
        if flag.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable(format!("injected {operation} failure")))
        } else {
            Ok(())
        }
    }
}

impl<S: TicketStore> TicketStore for FailingTicketStore<S> {
    async fn fetch_all(&self) -> StoreResult<Vec<Ticket>> {
        Self::check(&self.fail_reads, "read")?;
        self.inner.fetch_all().await
    }

    async fn fetch(&self, id: TicketId) -> StoreResult<Option<Ticket>> {
        Self::check(&self.fail_reads, "read")?;
        self.inner.fetch(id).await
    }

    async fn insert(&self, candidate: NewTicket) -> StoreResult<Ticket> {
        Self::check(&self.fail_writes, "write")?;
        self.inner.insert(candidate).await
    }

    async fn update_state(
        &self,
        id: TicketId,
        expected: TicketState,
        next: TicketState,
    ) -> StoreResult<StateUpdate> {
        Self::check(&self.fail_writes, "write")?;
        self.inner.update_state(id, expected, next).await
    }

    async fn delete(&self, id: TicketId) -> StoreResult<bool> {
        Self::check(&self.fail_writes, "write")?;
        self.inner.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn candidate(name: &str) -> NewTicket {
        NewTicket {
            id: TicketId::new(),
            holder_name: name.to_string(),
            note: "note".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn numbers_survive_deletion() {
        let store = InMemoryTicketStore::new();

        let first = store.insert(candidate("a")).await.unwrap();
        let second = store.insert(candidate("b")).await.unwrap();
        assert!(store.delete(second.id()).await.unwrap());

        let third = store.insert(candidate("c")).await.unwrap();
        assert_eq!(first.number().get(), 1);
        assert_eq!(third.number().get(), 3);
        assert_eq!(store.last_number(), 3);
    }

    #[tokio::test]
    async fn update_state_is_compare_and_set() {
        let store = InMemoryTicketStore::new();
        let ticket = store.insert(candidate("a")).await.unwrap();

        let applied = store
            .update_state(ticket.id(), TicketState::Waiting, TicketState::InProgress)
            .await
            .unwrap();
        assert_eq!(applied, StateUpdate::Applied);

        let stale = store
            .update_state(ticket.id(), TicketState::Waiting, TicketState::InProgress)
            .await
            .unwrap();
        assert_eq!(
            stale,
            StateUpdate::Stale {
                current: TicketState::InProgress
            }
        );

        let missing = store
            .update_state(TicketId::new(), TicketState::Waiting, TicketState::InProgress)
            .await
            .unwrap();
        assert_eq!(missing, StateUpdate::Missing);
    }

    #[tokio::test]
    async fn with_last_number_continues_sequence() {
        let store = InMemoryTicketStore::with_last_number(41);
        let ticket = store.insert(candidate("a")).await.unwrap();
        assert_eq!(ticket.number().get(), 42);
    }

    #[tokio::test]
    async fn exhausted_numbering_is_an_error() {
        let store = InMemoryTicketStore::with_last_number(u64::MAX - 1);

        let last = store.insert(candidate("a")).await.unwrap();
        assert_eq!(last.number().get(), u64::MAX);

        assert!(matches!(
            store.insert(candidate("b")).await,
            Err(StoreError::Corrupt(_))
        ));
        assert_eq!(store.len(), 1);
        assert_eq!(store.last_number(), u64::MAX);
    }

    #[tokio::test]
    async fn failing_store_toggles() {
        let store = FailingTicketStore::new(InMemoryTicketStore::new());

        store.fail_writes(true);
        assert!(matches!(
            store.insert(candidate("a")).await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.inner().is_empty());
        assert_eq!(store.inner().last_number(), 0);

        store.fail_writes(false);
        store.insert(candidate("a")).await.unwrap();

        store.fail_reads(true);
        assert!(store.fetch_all().await.is_err());
    }
}
