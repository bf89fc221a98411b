//! Ticket store trait: the persistence seam of the ledger.
//!
//! The ledger owns every business rule; a store only has to keep tickets
//! durably and hand out numbers atomically.
//!
//! # Implementations
//!
//! - `PostgresTicketStore` (in `ticket-queue-postgres`): production storage
//! - `InMemoryTicketStore` (in `ticket-queue-testing`): fast, deterministic tests

use crate::error::StoreError;
use crate::types::{NewTicket, Ticket, TicketId, TicketState};
use std::future::Future;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Outcome of a compare-and-set state update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateUpdate {
    /// The ticket was in the expected state and now holds the new one.
    Applied,
    /// No ticket with that id exists.
    Missing,
    /// The ticket exists but its state had already changed.
    Stale {
        /// State found in the store
        current: TicketState,
    },
}

/// Durable storage for tickets.
///
/// # Numbering contract
///
/// `insert` must assign `number` from a durable high-water mark: one more
/// than the largest number the store has ever issued, regardless of
/// deletions. Two concurrent inserts must never receive the same number,
/// and an insert that does not complete (error, or the future is dropped)
/// must not consume a number.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a single ledger can be shared
/// across tasks behind an `Arc`.
pub trait TicketStore: Send + Sync {
    /// Load every ticket, ordered by `created_at` then `number`.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails or a row cannot be decoded.
    fn fetch_all(&self) -> impl Future<Output = StoreResult<Vec<Ticket>>> + Send;

    /// Load a single ticket.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails or the row cannot be decoded.
    fn fetch(&self, id: TicketId) -> impl Future<Output = StoreResult<Option<Ticket>>> + Send;

    /// Persist a candidate, assigning it the next number.
    ///
    /// The returned ticket is what later reads yield; a store that rounds
    /// timestamps returns the rounded value.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails or the numbering space is
    /// exhausted; no number is consumed in either case.
    fn insert(&self, candidate: NewTicket) -> impl Future<Output = StoreResult<Ticket>> + Send;

    /// Move a ticket from `expected` to `next`, only if it is still in `expected`.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    fn update_state(
        &self,
        id: TicketId,
        expected: TicketState,
        next: TicketState,
    ) -> impl Future<Output = StoreResult<StateUpdate>> + Send;

    /// Delete a ticket. Returns `true` if a ticket was removed.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    fn delete(&self, id: TicketId) -> impl Future<Output = StoreResult<bool>> + Send;
}
