//! Error types for ledger and store operations.

use crate::types::{TicketId, TicketState};
use thiserror::Error;

/// Result type alias for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors reported by a [`TicketStore`](crate::store::TicketStore).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Database query or connection failed.
    #[error("Database error: {0}")]
    Database(String),

    /// Stored data could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The store is not reachable (pool exhausted, shut down, injected failure).
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store returned data that breaks a ledger invariant.
    #[error("Corrupt store state: {0}")]
    Corrupt(String),
}

/// Input field rejected by validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Ticket holder name
    HolderName,
    /// Ticket note
    Note,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HolderName => f.write_str("holder name"),
            Self::Note => f.write_str("note"),
        }
    }
}

/// Errors surfaced by [`TicketLedger`](crate::ledger::TicketLedger).
///
/// Each variant renders a distinct message so callers never have to collapse
/// validation, lookup and lifecycle failures into one generic error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Input to `create` was rejected before reaching the store.
    #[error("Invalid {field}: {reason}")]
    Validation {
        /// Offending field
        field: Field,
        /// Human-readable reason
        reason: String,
    },

    /// No ticket with this id exists.
    #[error("Ticket not found: {0}")]
    NotFound(TicketId),

    /// Requested state change is not a single forward step.
    #[error("Illegal transition for ticket {id}: {from} -> {to}")]
    IllegalTransition {
        /// Ticket being transitioned
        id: TicketId,
        /// Current state
        from: TicketState,
        /// Requested state
        to: TicketState,
    },

    /// The store failed; the operation had no effect.
    #[error("Persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

impl LedgerError {
    /// Whether retrying the same call could succeed.
    ///
    /// Only store failures are transient; the others depend on input or
    /// ticket state and will fail again unchanged.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }

    pub(crate) fn validation(field: Field, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}
