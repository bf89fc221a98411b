//! The ticket ledger: numbering, validation and lifecycle rules.
//!
//! The ledger is the only component allowed to create, transition or delete
//! tickets. It holds no ticket data of its own; every read goes to the store
//! and every caller receives owned snapshots.
//!
//! # Concurrency
//!
//! Number assignment is delegated to [`TicketStore::insert`], which hands out
//! numbers atomically from a durable high-water mark. The ledger holds no lock
//! across a store round trip, so concurrent `create` calls proceed in
//! parallel and still receive distinct numbers. State updates use
//! compare-and-set, so two administrators racing on the same ticket cannot
//! both succeed.

use crate::environment::Clock;
use crate::error::{Field, LedgerError, Result, StoreError};
use crate::store::{StateUpdate, TicketStore};
use crate::types::{NewTicket, QueueSummary, Ticket, TicketId, TicketNumber, TicketState, TicketsByState};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Maximum length of a holder name, in characters, after trimming.
pub const MAX_HOLDER_NAME_LEN: usize = 120;

/// Maximum length of a note, in characters, after trimming.
pub const MAX_NOTE_LEN: usize = 1000;

/// Authoritative owner of the ticket queue.
///
/// Construct one per process and share it behind an `Arc`.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use ticket_queue_core::environment::SystemClock;
/// use ticket_queue_core::ledger::TicketLedger;
/// use ticket_queue_core::store::TicketStore;
/// use ticket_queue_core::types::TicketState;
///
/// async fn example<S: TicketStore>(store: S) -> Result<(), Box<dyn std::error::Error>> {
///     let ledger = TicketLedger::new(store, Arc::new(SystemClock));
///
///     let ticket = ledger.create_ticket("Ana", "Consulta").await?;
///     ledger.transition(ticket.id(), TicketState::InProgress).await?;
///
///     let view = ledger.list_by_state().await?;
///     assert_eq!(view.in_progress.len(), 1);
///     Ok(())
/// }
/// ```
pub struct TicketLedger<S> {
    store: S,
    clock: Arc<dyn Clock>,
}

impl<S: TicketStore> TicketLedger<S> {
    /// Creates a ledger over `store`, stamping tickets with `clock`.
    #[must_use]
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Requests a new ticket and returns its number.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::Validation`] if the name or note is empty after
    ///   trimming, or too long
    /// - [`LedgerError::Persistence`] if the store fails; no ticket is created
    pub async fn create(&self, holder_name: &str, note: &str) -> Result<TicketNumber> {
        self.create_ticket(holder_name, note)
            .await
            .map(|ticket| ticket.number())
    }

    /// Requests a new ticket and returns the persisted snapshot.
    ///
    /// # Errors
    ///
    /// Same as [`TicketLedger::create`].
    #[tracing::instrument(skip_all, fields(ticket_id, number))]
    pub async fn create_ticket(&self, holder_name: &str, note: &str) -> Result<Ticket> {
        let holder_name = validate_text(Field::HolderName, holder_name, MAX_HOLDER_NAME_LEN)
            .inspect_err(Self::record_rejection)?;
        let note = validate_text(Field::Note, note, MAX_NOTE_LEN)
            .inspect_err(Self::record_rejection)?;

        let candidate = NewTicket {
            id: TicketId::new(),
            holder_name,
            note,
            created_at: self.clock.now(),
        };
        let span = tracing::Span::current();
        span.record("ticket_id", tracing::field::display(candidate.id));

        let ticket = self.store.insert(candidate).await.inspect_err(|e| {
            error!(error = %e, "Failed to persist new ticket");
        })?;

        // Numbers start at 1; a zero means the store ignored its contract.
        if ticket.number().get() == 0 {
            error!(ticket_id = %ticket.id(), "Store assigned number 0");
            return Err(StoreError::Corrupt(format!(
                "store assigned number 0 to ticket {}",
                ticket.id()
            ))
            .into());
        }

        span.record("number", ticket.number().get());
        metrics::counter!("tickets.created").increment(1);
        info!(number = %ticket.number(), "Ticket created");

        Ok(ticket)
    }

    /// Moves a ticket to `target`.
    ///
    /// Only `Waiting → InProgress` and `InProgress → Done` are accepted.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] if the id is unknown
    /// - [`LedgerError::IllegalTransition`] for any other requested change,
    ///   including one made illegal by a concurrent update
    /// - [`LedgerError::Persistence`] if the store fails
    ///
    /// The ticket is unchanged on every error.
    #[tracing::instrument(skip(self), fields(ticket_id = %id, target = %target))]
    pub async fn transition(&self, id: TicketId, target: TicketState) -> Result<()> {
        let ticket = self.load(id).await?;
        self.apply_transition(id, ticket.state(), target).await
    }

    /// Moves a ticket one step forward and returns its new state.
    ///
    /// # Errors
    ///
    /// As for [`TicketLedger::transition`]; a `Done` ticket yields
    /// [`LedgerError::IllegalTransition`].
    #[tracing::instrument(skip(self), fields(ticket_id = %id))]
    pub async fn advance(&self, id: TicketId) -> Result<TicketState> {
        let ticket = self.load(id).await?;
        let from = ticket.state();
        let Some(target) = from.next() else {
            return Err(Self::illegal(id, from, from));
        };

        self.apply_transition(id, from, target).await?;
        Ok(target)
    }

    /// Deletes a ticket. Deleting an absent ticket succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Persistence`] if the store fails.
    #[tracing::instrument(skip(self), fields(ticket_id = %id))]
    pub async fn remove(&self, id: TicketId) -> Result<()> {
        let removed = self.store.delete(id).await.inspect_err(|e| {
            error!(error = %e, "Failed to delete ticket");
        })?;

        if removed {
            metrics::counter!("tickets.removed").increment(1);
            info!("Ticket removed");
        } else {
            debug!("Ticket already absent");
        }
        Ok(())
    }

    /// Every ticket, ordered by creation time then number.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Persistence`] if the store fails.
    pub async fn list_all(&self) -> Result<Vec<Ticket>> {
        let mut tickets = self.store.fetch_all().await.inspect_err(|e| {
            error!(error = %e, "Failed to load tickets");
        })?;
        tickets.sort_by_key(Ticket::sort_key);
        Ok(tickets)
    }

    /// Tickets partitioned by state, each partition in canonical order.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Persistence`] if the store fails.
    pub async fn list_by_state(&self) -> Result<TicketsByState> {
        Ok(TicketsByState::partition(self.list_all().await?))
    }

    /// Looks up a single ticket.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Persistence`] if the store fails.
    pub async fn get(&self, id: TicketId) -> Result<Option<Ticket>> {
        Ok(self.store.fetch(id).await?)
    }

    /// Ticket counts per state.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Persistence`] if the store fails.
    pub async fn summary(&self) -> Result<QueueSummary> {
        Ok(self.list_by_state().await?.summary())
    }

    async fn load(&self, id: TicketId) -> Result<Ticket> {
        self.store
            .fetch(id)
            .await?
            .ok_or(LedgerError::NotFound(id))
            .inspect_err(Self::record_rejection)
    }

    async fn apply_transition(
        &self,
        id: TicketId,
        from: TicketState,
        target: TicketState,
    ) -> Result<()> {
        if !from.can_transition_to(target) {
            return Err(Self::illegal(id, from, target));
        }

        let outcome = self
            .store
            .update_state(id, from, target)
            .await
            .inspect_err(|e| {
                error!(error = %e, "Failed to update ticket state");
            })?;

        match outcome {
            StateUpdate::Applied => {
                metrics::counter!("tickets.transitioned", "to" => target.as_str()).increment(1);
                info!(%from, %target, "Ticket transitioned");
                Ok(())
            }
            StateUpdate::Missing => {
                let error = LedgerError::NotFound(id);
                Self::record_rejection(&error);
                Err(error)
            }
            // Every concurrent change leaves `target` unreachable: the ticket
            // already moved to `target` or past it.
            StateUpdate::Stale { current } => Err(Self::illegal(id, current, target)),
        }
    }

    fn illegal(id: TicketId, from: TicketState, to: TicketState) -> LedgerError {
        let error = LedgerError::IllegalTransition { id, from, to };
        Self::record_rejection(&error);
        error
    }

    fn record_rejection(error: &LedgerError) {
        let reason = match error {
            LedgerError::Validation { .. } => {
                debug!(%error, "Rejected ticket input");
                "validation"
            }
            LedgerError::NotFound(_) => {
                debug!(%error, "Unknown ticket");
                "not_found"
            }
            LedgerError::IllegalTransition { .. } => {
                warn!(%error, "Rejected state change");
                "illegal_transition"
            }
            LedgerError::Persistence(_) => return,
        };
        metrics::counter!("tickets.rejected", "reason" => reason).increment(1);
    }
}

/// Trims `value` and checks it is non-empty and at most `max_len` characters.
fn validate_text(field: Field, value: &str, max_len: usize) -> Result<String> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(LedgerError::validation(field, "cannot be empty"));
    }

    if trimmed.chars().count() > max_len {
        return Err(LedgerError::validation(
            field,
            format!("too long (max {max_len} characters)"),
        ));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_text_trims() {
        let value = validate_text(Field::HolderName, "  Ana  ", MAX_HOLDER_NAME_LEN).unwrap();
        assert_eq!(value, "Ana");
    }

    #[test]
    fn validate_text_rejects_blank() {
        for input in ["", "   ", "\t\n"] {
            let error = validate_text(Field::Note, input, MAX_NOTE_LEN).unwrap_err();
            assert!(matches!(
                error,
                LedgerError::Validation {
                    field: Field::Note,
                    ..
                }
            ));
        }
    }

    #[test]
    fn validate_text_counts_characters_not_bytes() {
        let name = "ñ".repeat(MAX_HOLDER_NAME_LEN);
        assert!(validate_text(Field::HolderName, &name, MAX_HOLDER_NAME_LEN).is_ok());

        let too_long = "a".repeat(MAX_HOLDER_NAME_LEN + 1);
        let error = validate_text(Field::HolderName, &too_long, MAX_HOLDER_NAME_LEN).unwrap_err();
        assert!(error.to_string().contains("too long"));
    }
}
